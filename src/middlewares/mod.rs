pub mod no_store;
