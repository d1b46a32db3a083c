pub mod confirm;
pub mod entry_form;
pub mod help_overlay;
pub mod path_prompt;
pub mod station_list;
