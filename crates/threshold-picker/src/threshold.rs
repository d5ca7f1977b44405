use std::fmt;

use threshold_picker_imgproc::{color, threshold};

use crate::{error::PickerError, session::Session};

/// Inclusive intensity range selecting the foreground of the binary view.
///
/// `lower <= upper` is not required: an inverted range simply selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdBounds {
    /// Smallest gray value kept as foreground.
    pub lower: u8,
    /// Largest gray value kept as foreground.
    pub upper: u8,
}

impl ThresholdBounds {
    /// Create bounds from a lower and an upper value.
    pub fn new(lower: u8, upper: u8) -> Self {
        Self { lower, upper }
    }

    /// Whether a gray value falls inside the bounds.
    pub fn contains(&self, value: u8) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl Default for ThresholdBounds {
    fn default() -> Self {
        Self {
            lower: 0,
            upper: 255,
        }
    }
}

impl fmt::Display for ThresholdBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Threshold lower value: {}, Threshold upper value: {}",
            self.lower, self.upper
        )
    }
}

impl Session {
    /// Recompute the grayscale and binary views from the working image.
    ///
    /// A binary pixel is 255 iff its gray value lies in `[lower, upper]`.
    pub fn recompute(&mut self) -> Result<(), PickerError> {
        color::gray_from_rgb_u8(&self.working, &mut self.gray)?;
        threshold::in_range(
            &self.gray,
            &mut self.binary,
            &[self.bounds.lower],
            &[self.bounds.upper],
        )?;

        log::debug!(
            "recomputed binary view: {} foreground pixels ({})",
            self.foreground_count(),
            self.bounds
        );

        Ok(())
    }

    /// Replace the threshold bounds and recompute the binary view.
    pub fn set_bounds(&mut self, bounds: ThresholdBounds) -> Result<(), PickerError> {
        if bounds != self.bounds {
            log::debug!("threshold bounds changed: {} -> {}", self.bounds, bounds);
        }
        self.bounds = bounds;
        self.recompute()
    }

    /// Select the bounds automatically with Otsu's method.
    ///
    /// The lower bound becomes the first intensity of Otsu's foreground class and the
    /// upper bound is forced to 255. Returns the new bounds.
    pub fn auto_threshold(&mut self) -> Result<ThresholdBounds, PickerError> {
        let otsu = threshold::otsu_threshold_value(&self.gray)?;
        // otsu never splits above 254: the top class is never empty
        let bounds = ThresholdBounds::new(otsu.saturating_add(1), 255);

        log::info!("otsu threshold {otsu}, new bounds: {bounds}");

        self.set_bounds(bounds)?;
        Ok(bounds)
    }

    /// Number of pixels currently selected by the binary view.
    pub fn foreground_count(&self) -> usize {
        self.binary.as_slice().iter().filter(|&&v| v != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use threshold_picker_image::{Image, ImageSize};
    use threshold_picker_imgproc::threshold::{otsu_threshold_value, threshold_binary};

    use super::ThresholdBounds;
    use crate::{error::PickerError, session::Session};

    fn ramp() -> Result<Image<u8, 3>, PickerError> {
        let data = (0..=255u8).flat_map(|v| [v, v, v]).collect::<Vec<_>>();
        Ok(Image::new(
            ImageSize {
                width: 16,
                height: 16,
            },
            data,
        )?)
    }

    #[test]
    fn binary_is_inclusive_range() -> Result<(), PickerError> {
        let mut session = Session::new(ramp()?, ThresholdBounds::default())?;

        for bounds in [
            ThresholdBounds::new(0, 255),
            ThresholdBounds::new(128, 255),
            ThresholdBounds::new(10, 10),
            ThresholdBounds::new(99, 180),
        ] {
            session.set_bounds(bounds)?;
            for (g, b) in session.gray().as_slice().iter().zip(session.binary().as_slice()) {
                assert_eq!(*b == 255, bounds.contains(*g));
            }
            let expected = (bounds.upper - bounds.lower) as usize + 1;
            assert_eq!(session.foreground_count(), expected);
        }

        Ok(())
    }

    #[test]
    fn inverted_bounds_select_nothing() -> Result<(), PickerError> {
        let mut session = Session::new(ramp()?, ThresholdBounds::new(200, 100))?;
        assert_eq!(session.foreground_count(), 0);
        Ok(())
    }

    #[test]
    fn auto_threshold_matches_otsu_classification() -> Result<(), PickerError> {
        let mut data = Vec::new();
        for v in [30u8, 40, 50, 60, 180, 200, 220, 240] {
            data.extend(std::iter::repeat([v, v, v]).take(8).flatten());
        }
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 8,
                height: 8,
            },
            data,
        )?;
        let mut session = Session::new(image, ThresholdBounds::new(17, 42))?;

        let bounds = session.auto_threshold()?;
        assert_eq!(bounds.upper, 255);
        assert_eq!(session.bounds(), bounds);

        let otsu = otsu_threshold_value(session.gray())?;
        assert_eq!(bounds.lower, otsu + 1);

        let mut expected = Image::<u8, 1>::from_size_val(session.gray().size(), 0)?;
        threshold_binary(session.gray(), &mut expected, otsu, 255)?;
        assert_eq!(session.binary(), &expected);
        assert_eq!(session.foreground_count(), 32);

        Ok(())
    }

    #[test]
    fn bounds_display() {
        assert_eq!(
            ThresholdBounds::default().to_string(),
            "Threshold lower value: 0, Threshold upper value: 255"
        );
    }
}
