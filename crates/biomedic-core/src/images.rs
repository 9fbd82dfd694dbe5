// ABOUTME: Image listing wire type shared with the server, and the image picker state fed from it.
// ABOUTME: The picker filters filenames by substring and turns a pick into a served image reference.

use serde::{Deserialize, Serialize};

/// URL prefix under which equipment images are served.
pub const IMAGE_ROUTE_PREFIX: &str = "/images/equipos/";

/// Extensions the image listing accepts, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "svg", "webp"];

/// Body of `GET /api/images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageListing {
    pub ok: bool,
    /// Present on success, even when the directory holds no images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ImageListing {
    pub fn success(images: Vec<String>) -> Self {
        Self {
            ok: true,
            images: Some(images),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            images: None,
            message: Some(message.into()),
        }
    }
}

/// Whether `file_name` ends in one of the accepted image extensions.
pub fn is_image_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Reference stored in a record's image field for a picked file.
pub fn image_reference(file_name: &str) -> String {
    format!("{}{}", IMAGE_ROUTE_PREFIX, file_name)
}

#[derive(Debug, Clone, Default)]
pub struct ImagePicker {
    available: Vec<String>,
    filter: String,
    selected: Option<String>,
}

impl ImagePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        !self.available.is_empty()
    }

    /// Fill the picker from a listing response. A failed listing leaves the
    /// picker as it was.
    pub fn populate(&mut self, listing: ImageListing) {
        if listing.ok {
            self.available = listing.images.unwrap_or_default();
        } else {
            tracing::error!(
                "image listing failed: {}",
                listing.message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_lowercase();
    }

    /// Available filenames containing the current filter, case-insensitively.
    pub fn filtered(&self) -> Vec<&str> {
        self.available
            .iter()
            .filter(|name| name.to_lowercase().contains(&self.filter))
            .map(String::as_str)
            .collect()
    }

    /// Pick a filename and return the image reference for the record form.
    pub fn select(&mut self, file_name: &str) -> String {
        self.selected = Some(file_name.to_string());
        image_reference(file_name)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extension_check_is_case_insensitive() {
        assert!(is_image_file("pump.PNG"));
        assert!(is_image_file("a.b.webp"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("png"));
    }

    #[test]
    fn listing_serializes_like_the_endpoint() {
        let ok = serde_json::to_value(ImageListing::success(vec!["a.png".to_string()])).unwrap();
        assert_eq!(ok, serde_json::json!({ "ok": true, "images": ["a.png"] }));

        let empty = serde_json::to_value(ImageListing::success(Vec::new())).unwrap();
        assert_eq!(empty, serde_json::json!({ "ok": true, "images": [] }));

        let err = serde_json::to_value(ImageListing::failure("boom")).unwrap();
        assert_eq!(err, serde_json::json!({ "ok": false, "message": "boom" }));
    }

    #[test]
    fn picker_filters_and_selects() {
        let mut picker = ImagePicker::new();
        picker.populate(ImageListing::success(vec![
            "Pump.png".to_string(),
            "monitor.jpg".to_string(),
            "pump-2.gif".to_string(),
        ]));

        picker.set_filter("PUMP");
        assert_eq!(picker.filtered(), vec!["Pump.png", "pump-2.gif"]);

        assert_eq!(picker.select("Pump.png"), "/images/equipos/Pump.png");
        assert_eq!(picker.selected(), Some("Pump.png"));
        picker.clear_selection();
        assert!(picker.selected().is_none());
    }

    #[test]
    fn failed_listing_leaves_picker_empty() {
        let mut picker = ImagePicker::new();
        picker.populate(ImageListing::failure("could not read images"));
        assert!(!picker.is_loaded());
        assert!(picker.filtered().is_empty());
    }
}
