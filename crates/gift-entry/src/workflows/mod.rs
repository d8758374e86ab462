pub mod gift_entry;
