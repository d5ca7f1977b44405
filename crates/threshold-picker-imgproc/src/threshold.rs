use num_traits::Zero;

use threshold_picker_image::{Image, ImageError};

use crate::{histogram::compute_histogram, parallel};

/// Apply a binary threshold to an image.
///
/// Values strictly greater than `threshold` are set to `max_value`, the rest to zero.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output image of an arbitrary number of channels and type.
/// * `threshold` - The threshold value. Must be the same type as the image.
/// * `max_value` - The maximum value to use when the input value is greater than the threshold.
///
/// # Examples
///
/// ```
/// use threshold_picker_image::{Image, ImageSize};
/// use threshold_picker_imgproc::threshold::threshold_binary;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0, 255, 0, 255, 255, 255]);
/// ```
pub fn threshold_binary<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
    max_value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            max_value
        } else {
            T::zero()
        };
    });

    Ok(())
}

/// Apply a range threshold to an image.
///
/// A pixel of the output mask is 255 when every channel lies within the inclusive
/// range `[lower_bound, upper_bound]`, and 0 otherwise. Bounds given out of order
/// describe an empty range and yield an all-zero mask.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output single channel mask.
/// * `lower_bound` - The lower bound for each channel.
/// * `upper_bound` - The upper bound for each channel.
///
/// # Examples
///
/// ```
/// use threshold_picker_image::{Image, ImageSize};
/// use threshold_picker_imgproc::threshold::in_range;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 4,
///         height: 1,
///     },
///     vec![10, 128, 200, 255],
/// )
/// .unwrap();
///
/// let mut mask = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// in_range(&image, &mut mask, &[128], &[200]).unwrap();
/// assert_eq!(mask.as_slice(), &[0, 255, 255, 0]);
/// ```
pub fn in_range<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<u8, 1>,
    lower_bound: &[T; C],
    upper_bound: &[T; C],
) -> Result<(), ImageError>
where
    T: Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // parallelize the operation by rows
    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let is_in_range = src_pixel
            .iter()
            .zip(lower_bound.iter().zip(upper_bound.iter()))
            .all(|(src_val, (lower, upper))| src_val >= lower && src_val <= upper);
        dst_pixel[0] = if is_in_range { 255 } else { 0 };
    });

    Ok(())
}

/// Compute Otsu's global threshold of a grayscale image.
///
/// The returned value `t` maximizes the between-class variance of the two classes
/// `value <= t` (background) and `value > t` (foreground), so it can be fed directly
/// into [`threshold_binary`]. Images with a single intensity have no valid split and
/// yield 0.
///
/// # Examples
///
/// ```
/// use threshold_picker_image::{Image, ImageSize};
/// use threshold_picker_imgproc::threshold::otsu_threshold_value;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// assert_eq!(otsu_threshold_value(&image).unwrap(), 100);
/// ```
pub fn otsu_threshold_value(src: &Image<u8, 1>) -> Result<u8, ImageError> {
    const BINS: usize = 256;
    let mut histogram = vec![0usize; BINS];
    compute_histogram(src, &mut histogram, BINS)?;

    let total_pixels = (src.width() * src.height()) as f64;
    let sum_total = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum::<f64>();

    let mut best_variance = 0.0;
    let mut best_threshold = 0u8;

    let mut weight_back = 0.0;
    let mut sum_back = 0.0;

    for (current_threshold, &hist_count) in histogram.iter().enumerate() {
        weight_back += hist_count as f64;
        sum_back += current_threshold as f64 * hist_count as f64;

        // skip empty classes
        if weight_back == 0.0 || weight_back == total_pixels {
            continue;
        }

        let weight_fore = total_pixels - weight_back;
        let mean_back = sum_back / weight_back;
        let mean_fore = (sum_total - sum_back) / weight_fore;

        let variance = weight_back * weight_fore * (mean_back - mean_fore).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = current_threshold as u8;
        }
    }

    Ok(best_threshold)
}
