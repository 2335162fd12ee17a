pub mod quote_request;
pub mod quote_response;
pub mod request_reader;
