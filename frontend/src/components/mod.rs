// Reusable components live here.

pub mod book_meeting_modal;
pub mod confirmation_modal;
pub mod header;
pub mod loading_spinner;
pub mod pagination;
pub mod stats_card;
pub mod toast;
