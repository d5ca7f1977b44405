use threshold_picker_image::Image;

use crate::{error::PickerError, threshold::ThresholdBounds};

/// Receives the binary view every time the session state changes.
pub trait Viewer {
    /// Display the binary view together with the bounds that produced it.
    fn show(&mut self, binary: &Image<u8, 1>, bounds: ThresholdBounds) -> Result<(), PickerError>;
}

/// Streams the binary view and the bounds to a spawned Rerun viewer.
pub struct RerunViewer {
    rec: rerun::RecordingStream,
}

impl RerunViewer {
    /// Spawn a Rerun viewer window with the given title.
    pub fn spawn(title: &str) -> Result<Self, PickerError> {
        let rec = rerun::RecordingStreamBuilder::new(title).spawn()?;
        Ok(Self { rec })
    }
}

impl Viewer for RerunViewer {
    fn show(&mut self, binary: &Image<u8, 1>, bounds: ThresholdBounds) -> Result<(), PickerError> {
        self.rec.log(
            "binary",
            &rerun::Image::from_elements(
                binary.as_slice(),
                [binary.width() as u32, binary.height() as u32],
                rerun::ColorModel::L,
            ),
        )?;

        self.rec
            .log("bounds", &rerun::TextLog::new(bounds.to_string()))?;

        Ok(())
    }
}

/// Viewer used without a display: only logs a summary of each frame.
#[derive(Debug, Default)]
pub struct HeadlessViewer;

impl Viewer for HeadlessViewer {
    fn show(&mut self, binary: &Image<u8, 1>, bounds: ThresholdBounds) -> Result<(), PickerError> {
        let foreground = binary.as_slice().iter().filter(|&&v| v != 0).count();
        log::info!(
            "binary view {}: {foreground} foreground pixels ({bounds})",
            binary.size()
        );
        Ok(())
    }
}
