// ABOUTME: API module containing the HTTP handlers for the equipment image endpoints.

pub mod images;
