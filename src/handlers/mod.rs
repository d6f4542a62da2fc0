pub mod listing_handlers;
