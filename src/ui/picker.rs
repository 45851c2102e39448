/// Native file dialog for choosing a digit image
use rfd::FileDialog;
use std::path::PathBuf;

/// Extensions offered by the dialog filter
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Show the picker. Blocks until the user confirms or cancels.
pub fn pick_digit_image() -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Select a digit image")
        .add_filter("Images", &IMAGE_EXTENSIONS);

    if let Some(dir) = initial_directory(dirs::picture_dir(), dirs::download_dir(), dirs::home_dir()) {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}

/// Pictures, then Downloads, then home; only directories that exist
fn initial_directory(
    pictures: Option<PathBuf>,
    downloads: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    [pictures, downloads]
        .into_iter()
        .flatten()
        .find(|dir| dir.is_dir())
        .or(home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_directory_order() {
        let existing = std::env::temp_dir();
        let missing = PathBuf::from("/nonexistent/Pictures");
        let home = PathBuf::from("/home/someone");

        assert_eq!(
            initial_directory(Some(existing.clone()), None, Some(home.clone())),
            Some(existing.clone())
        );
        assert_eq!(
            initial_directory(Some(missing.clone()), Some(existing.clone()), Some(home.clone())),
            Some(existing)
        );
        assert_eq!(initial_directory(Some(missing), None, Some(home.clone())), Some(home));
        assert_eq!(initial_directory(None, None, None), None);
    }
}
