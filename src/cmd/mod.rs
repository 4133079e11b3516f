pub mod info;
pub mod output;
pub mod providers;
pub mod search;
pub mod stream;
pub mod update;
