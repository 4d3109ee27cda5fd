pub mod inventories;
pub mod items;
pub mod root;
pub mod users;
