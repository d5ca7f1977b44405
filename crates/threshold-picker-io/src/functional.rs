use std::path::Path;

use threshold_picker_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path and converts it to RGB8.
///
/// The method tries to read from any image format supported by the image crate.
/// Grayscale, alpha and 16-bit inputs are converted to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB8 image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path));
    }

    let img = image::ImageReader::open(&file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = Image::new(size, img.into_rgb8().into_raw())?;

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::read_image_any_rgb8;
    use crate::error::IoError;
    use std::path::Path;
    use threshold_picker_image::{Image, ImageSize};

    fn write_image_png_rgb8(file_path: &Path, image: &Image<u8, 3>) -> Result<(), IoError> {
        image::save_buffer(
            file_path,
            image.as_slice(),
            image.width() as u32,
            image.height() as u32,
            image::ColorType::Rgb8,
        )?;
        Ok(())
    }

    #[test]
    fn read_any_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("pattern.png");

        let data = (0..4 * 3 * 3).map(|v| (v * 7) as u8).collect::<Vec<_>>();
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 4,
                height: 3,
            },
            data,
        )?;
        write_image_png_rgb8(&file_path, &image)?;

        let image_back = read_image_any_rgb8(&file_path)?;
        assert_eq!(image_back.size(), image.size());
        assert_eq!(image_back.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn read_gray_as_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");
        image::save_buffer(&file_path, &[0u8, 128, 255, 64], 2, 2, image::ColorType::L8)?;

        let image = read_image_any_rgb8(&file_path)?;
        assert_eq!(image.num_channels(), 3);
        assert_eq!(image.get([0, 1, 0]), Some(&128));
        assert_eq!(image.get([0, 1, 2]), Some(&128));

        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let result = read_image_any_rgb8("does/not/exist.png");
        assert!(matches!(result, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_invalid_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("garbage.png");
        std::fs::write(&file_path, b"definitely not an image")?;

        let result = read_image_any_rgb8(&file_path);
        assert!(matches!(result, Err(IoError::ImageDecodeError(_))));

        Ok(())
    }
}
