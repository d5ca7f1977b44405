use rayon::prelude::*;
use threshold_picker_image::{Image, ImageError};

use super::kernels::Kernel;

// Reduce every pixel channel over the active kernel footprint. Neighbours falling
// outside the image are skipped, so borders neither erode nor dilate.
fn reduce_footprint<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    reduce: impl Fn(T, T) -> T + Send + Sync,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let width = src.width();
    let height = src.height();
    if width == 0 || height == 0 {
        return Ok(());
    }

    let offsets = kernel.offsets().collect::<Vec<_>>();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_mut(width * C)
        .enumerate()
        .for_each(|(y, row_chunk)| {
            for x in 0..width {
                for c in 0..C {
                    let mut acc = src_data[(y * width + x) * C + c];
                    for &(dy, dx) in offsets.iter() {
                        let ny = y as isize + dy;
                        let nx = x as isize + dx;
                        if ny < 0 || nx < 0 || ny >= height as isize || nx >= width as isize {
                            continue;
                        }
                        let idx = (ny as usize * width + nx as usize) * C + c;
                        acc = reduce(acc, src_data[idx]);
                    }
                    row_chunk[x * C + c] = acc;
                }
            }
        });

    Ok(())
}

/// Dilate an image using a [`Kernel`].
///
/// Dilation expands white regions in the image. Each pixel is replaced
/// by the maximum value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if shapes don't match.
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    reduce_footprint(src, dst, kernel, |a, b| a.max(b))
}

/// Erode an image using a [`Kernel`].
///
/// Erosion shrinks white regions in the image. Each pixel is replaced
/// by the minimum value in the neighborhood defined by the kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
///
/// # Returns
///
/// Ok(()) on success, or [`ImageError`] if shapes don't match.
///
/// # Example
///
/// ```
/// use threshold_picker_image::{Image, ImageSize};
/// use threshold_picker_imgproc::morphology::{erode, Kernel, KernelShape};
///
/// let src = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 1 },
///     vec![255, 255, 0],
/// )
/// .unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// erode(&src, &mut dst, &Kernel::new(KernelShape::Rect, 1).unwrap()).unwrap();
/// assert_eq!(dst.as_slice(), &[255, 0, 0]);
/// ```
pub fn erode<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    reduce_footprint(src, dst, kernel, |a, b| a.min(b))
}

/// Opening: erosion followed by dilation.
///
/// Removes small objects and smooths object boundaries.
pub fn open<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    let mut temp_img = src.clone();
    erode(src, &mut temp_img, kernel)?;
    dilate(&temp_img, dst, kernel)?;
    Ok(())
}

/// Closing: dilation followed by erosion.
///
/// Fills small holes and smooths object boundaries.
pub fn close<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    let mut temp_img = src.clone();
    dilate(src, &mut temp_img, kernel)?;
    erode(&temp_img, dst, kernel)?;
    Ok(())
}
