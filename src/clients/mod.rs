pub mod caldav;
