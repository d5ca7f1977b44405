use std::path::Path;

use threshold_picker_image::{Image, ImageError};
use threshold_picker_imgproc::morphology::{self, Kernel, KernelShape};
use threshold_picker_io::functional as F;

use crate::{
    effects::{shape_name, EffectKind, EffectLog},
    error::PickerError,
    threshold::ThresholdBounds,
};

/// State of one picker session.
///
/// Owns the original image, the working copy every operation mutates, the derived
/// grayscale and binary views, the threshold bounds and the effect log. The binary
/// view is recomputed by every mutating method, so it always reflects the current
/// working image and bounds.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) original: Image<u8, 3>,
    pub(crate) working: Image<u8, 3>,
    pub(crate) gray: Image<u8, 1>,
    pub(crate) binary: Image<u8, 1>,
    pub(crate) bounds: ThresholdBounds,
    pub(crate) effects: EffectLog,
}

impl Session {
    /// Start a session on an RGB8 image.
    pub fn new(original: Image<u8, 3>, bounds: ThresholdBounds) -> Result<Self, PickerError> {
        let gray = Image::from_size_val(original.size(), 0)?;
        let binary = Image::from_size_val(original.size(), 0)?;

        let mut session = Self {
            working: original.clone(),
            original,
            gray,
            binary,
            bounds,
            effects: EffectLog::new(),
        };
        session.recompute()?;

        Ok(session)
    }

    /// Load the image at `path` and start a session on it.
    pub fn open(path: impl AsRef<Path>, bounds: ThresholdBounds) -> Result<Self, PickerError> {
        let path = path.as_ref();
        let original =
            F::read_image_any_rgb8(path).map_err(|source| PickerError::CannotOpenImage {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("loaded {} ({})", path.display(), original.size());

        Self::new(original, bounds)
    }

    /// The image as loaded.
    pub fn original(&self) -> &Image<u8, 3> {
        &self.original
    }

    /// The image with every effect applied.
    pub fn working(&self) -> &Image<u8, 3> {
        &self.working
    }

    /// Grayscale view of the working image.
    pub fn gray(&self) -> &Image<u8, 1> {
        &self.gray
    }

    /// Binary view: 255 where the gray value lies within the bounds.
    pub fn binary(&self) -> &Image<u8, 1> {
        &self.binary
    }

    /// Current threshold bounds.
    pub fn bounds(&self) -> ThresholdBounds {
        self.bounds
    }

    /// Effects applied since the session started or was last cleared.
    pub fn effects(&self) -> &EffectLog {
        &self.effects
    }

    /// Largest kernel radius accepted by [`Session::apply`].
    ///
    /// A kernel of this radius already covers the whole image from any anchor.
    pub fn max_radius(&self) -> usize {
        self.working.width().max(self.working.height())
    }

    /// Drop every effect: restore the working image from the original and empty the log.
    ///
    /// The threshold bounds are kept.
    pub fn clear_effects(&mut self) -> Result<(), PickerError> {
        self.working = self.original.clone();
        self.effects.clear();
        log::info!("effects cleared");
        self.recompute()
    }

    /// Apply a morphological transform to the working image and record it.
    ///
    /// The structuring element has side `2 * radius + 1` and is anchored at its center.
    /// Radii above [`Session::max_radius`] are rejected and leave the session untouched.
    pub fn apply(
        &mut self,
        kind: EffectKind,
        shape: KernelShape,
        radius: usize,
    ) -> Result<(), PickerError> {
        if radius > self.max_radius() {
            return Err(ImageError::InvalidKernelRadius(radius).into());
        }

        let kernel = Kernel::new(shape, radius)?;
        let mut dst = Image::from_size_val(self.working.size(), 0u8)?;

        match kind {
            EffectKind::Erosion => morphology::erode(&self.working, &mut dst, &kernel)?,
            EffectKind::Dilation => morphology::dilate(&self.working, &mut dst, &kernel)?,
            EffectKind::Opening => morphology::open(&self.working, &mut dst, &kernel)?,
            EffectKind::Closing => morphology::close(&self.working, &mut dst, &kernel)?,
        }

        self.working = dst;
        self.effects.append(kind, shape, radius);
        log::info!("applied {kind} with {} kernel of radius {radius}", shape_name(shape));

        self.recompute()
    }
}

#[cfg(test)]
mod tests {
    use threshold_picker_image::{Image, ImageError, ImageSize};
    use threshold_picker_imgproc::morphology::KernelShape;

    use super::Session;
    use crate::{effects::EffectKind, error::PickerError, threshold::ThresholdBounds};

    // 6x6 image with a bright 3x3 block, a single bright speck and a dark hole.
    fn scene() -> Result<Image<u8, 3>, PickerError> {
        let mut gray = vec![0u8; 36];
        for y in 2..5 {
            for x in 2..5 {
                gray[y * 6 + x] = 200;
            }
        }
        gray[0] = 250;
        let data = gray.iter().flat_map(|&v| [v, v, v]).collect::<Vec<_>>();
        Ok(Image::new(
            ImageSize {
                width: 6,
                height: 6,
            },
            data,
        )?)
    }

    #[test]
    fn clear_is_idempotent() -> Result<(), PickerError> {
        let mut session = Session::new(scene()?, ThresholdBounds::new(128, 255))?;
        session.apply(EffectKind::Dilation, KernelShape::Cross, 1)?;
        assert_ne!(session.working(), session.original());

        session.clear_effects()?;
        let once = session.clone();
        session.clear_effects()?;

        assert_eq!(session.working(), once.working());
        assert_eq!(session.working(), session.original());
        assert_eq!(session.binary(), once.binary());
        assert!(session.effects().is_empty());
        assert_eq!(session.bounds(), ThresholdBounds::new(128, 255));

        Ok(())
    }

    #[test]
    fn erosion_radius_zero_keeps_image_but_logs() -> Result<(), PickerError> {
        let mut session = Session::new(scene()?, ThresholdBounds::new(128, 255))?;
        let before = session.working().clone();

        session.apply(EffectKind::Erosion, KernelShape::Rect, 0)?;

        assert_eq!(session.working(), &before);
        assert_eq!(session.effects().len(), 1);
        assert_eq!(session.effects().render(), "Erosion: Kernel(Rectangular, 0)\n");

        Ok(())
    }

    #[test]
    fn opening_is_erosion_then_dilation() -> Result<(), PickerError> {
        let bounds = ThresholdBounds::new(128, 255);
        let mut opened = Session::new(scene()?, bounds)?;
        opened.apply(EffectKind::Opening, KernelShape::Rect, 1)?;

        let mut two_step = Session::new(scene()?, bounds)?;
        two_step.apply(EffectKind::Erosion, KernelShape::Rect, 1)?;
        two_step.apply(EffectKind::Dilation, KernelShape::Rect, 1)?;

        assert_eq!(opened.working(), two_step.working());
        assert_eq!(opened.binary(), two_step.binary());
        // speck gone, block kept
        assert_eq!(opened.binary().get([0, 0, 0]), Some(&0));
        assert_eq!(opened.foreground_count(), 9);

        Ok(())
    }

    #[test]
    fn closing_is_dilation_then_erosion() -> Result<(), PickerError> {
        let mut gray = vec![255u8; 25];
        gray[12] = 0;
        let data = gray.iter().flat_map(|&v| [v, v, v]).collect::<Vec<_>>();
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 5,
                height: 5,
            },
            data,
        )?;
        let bounds = ThresholdBounds::new(128, 255);

        let mut closed = Session::new(image.clone(), bounds)?;
        assert_eq!(closed.foreground_count(), 24);
        closed.apply(EffectKind::Closing, KernelShape::Ellipse, 1)?;

        let mut two_step = Session::new(image, bounds)?;
        two_step.apply(EffectKind::Dilation, KernelShape::Ellipse, 1)?;
        two_step.apply(EffectKind::Erosion, KernelShape::Ellipse, 1)?;

        assert_eq!(closed.working(), two_step.working());
        assert_eq!(closed.foreground_count(), 25);

        Ok(())
    }

    #[test]
    fn operations_compose_in_order() -> Result<(), PickerError> {
        let mut session = Session::new(scene()?, ThresholdBounds::new(128, 255))?;
        session.apply(EffectKind::Dilation, KernelShape::Rect, 1)?;
        session.apply(EffectKind::Erosion, KernelShape::Cross, 2)?;
        session.apply(EffectKind::Closing, KernelShape::Ellipse, 1)?;

        let kinds = session.effects().iter().map(|e| e.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![EffectKind::Dilation, EffectKind::Erosion, EffectKind::Closing]
        );

        Ok(())
    }

    #[test]
    fn oversized_radius_is_rejected() -> Result<(), PickerError> {
        let mut session = Session::new(scene()?, ThresholdBounds::new(128, 255))?;
        assert_eq!(session.max_radius(), 6);

        session.apply(EffectKind::Erosion, KernelShape::Ellipse, 6)?;
        assert_eq!(session.effects().len(), 1);

        let before = session.clone();
        for radius in [7, 100_000, 1usize << (usize::BITS / 2), usize::MAX] {
            let result = session.apply(EffectKind::Dilation, KernelShape::Rect, radius);
            assert!(matches!(
                result,
                Err(PickerError::Image(ImageError::InvalidKernelRadius(r))) if r == radius
            ));
        }
        assert_eq!(session.working(), before.working());
        assert_eq!(session.effects().len(), 1);

        Ok(())
    }

    #[test]
    fn open_missing_image_fails() {
        let result = Session::open("no/such/image.png", ThresholdBounds::default());
        assert!(matches!(
            result,
            Err(PickerError::CannotOpenImage { .. })
        ));
    }
}
