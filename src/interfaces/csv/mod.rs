pub mod quote_writer;
