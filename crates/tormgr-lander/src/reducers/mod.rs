pub mod app_reducer;
pub mod editor_reducer;
pub mod folders_reducer;
pub mod session_reducer;
pub mod ui_reducer;
