use std::io::{self, BufRead, Write};

use threshold_picker_imgproc::morphology::KernelShape;

use crate::{menu::MenuChoice, threshold::ThresholdBounds};

const KERNEL_MENU: &str = "Which type of kernel do you want?\n\
                           0 - Rectangular\n\
                           1 - Cross\n\
                           2 - Elliptical\n";

/// Map a kernel type code to its shape.
pub fn shape_from_code(code: &str) -> Option<KernelShape> {
    match code.parse::<u8>().ok()? {
        0 => Some(KernelShape::Rect),
        1 => Some(KernelShape::Cross),
        2 => Some(KernelShape::Ellipse),
        _ => None,
    }
}

/// Line oriented prompts over any reader and writer.
///
/// Every read returns `None` once the input is exhausted.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Create a prompt reading from `input` and writing to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompt and return the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write text to the output and flush it.
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    // Bytes that are not UTF-8 are replaced, so they fail to parse like any other bad answer.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    /// Read a menu choice. End of input reads as [`MenuChoice::Exit`].
    pub fn read_menu_choice(&mut self) -> io::Result<MenuChoice> {
        Ok(match self.read_line()? {
            Some(line) => MenuChoice::parse(&line),
            None => MenuChoice::Exit,
        })
    }

    /// Ask for a structuring element shape and radius.
    ///
    /// Unknown shape codes are rejected and asked again. A radius that is not a
    /// non-negative integer falls back to 0, one above `max_radius` is asked again.
    /// Returns `None` when the input ends.
    pub fn read_kernel(&mut self, max_radius: usize) -> io::Result<Option<(KernelShape, usize)>> {
        let shape = loop {
            self.say(KERNEL_MENU)?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match shape_from_code(&line) {
                Some(shape) => break shape,
                None => self.say(&format!("Invalid kernel type: {line:?}\n"))?,
            }
        };

        loop {
            self.say("Enter the size of the kernel: ")?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let radius = line.parse::<usize>().unwrap_or_else(|err| {
                // digits too long for a usize are still a size, just an oversized one
                if line.bytes().all(|b| b.is_ascii_digit()) && !line.is_empty() {
                    return usize::MAX;
                }
                log::warn!("invalid kernel size {line:?} ({err}), using 0");
                0
            });

            if radius <= max_radius {
                return Ok(Some((shape, radius)));
            }
            self.say(&format!("Kernel size too large, the maximum is {max_radius}\n"))?;
        }
    }

    /// Ask for new threshold bounds, one value per line.
    ///
    /// An empty or invalid answer keeps the current value.
    pub fn read_bounds(&mut self, current: ThresholdBounds) -> io::Result<ThresholdBounds> {
        let lower = self.read_bound("Threshold lower value", current.lower)?;
        let upper = self.read_bound("Threshold upper value", current.upper)?;
        Ok(ThresholdBounds::new(lower, upper))
    }

    fn read_bound(&mut self, label: &str, current: u8) -> io::Result<u8> {
        self.say(&format!("{label} [{current}]: "))?;
        let Some(line) = self.read_line()? else {
            return Ok(current);
        };
        if line.is_empty() {
            return Ok(current);
        }
        Ok(line.parse::<u8>().unwrap_or_else(|_| {
            log::warn!("invalid {label} {line:?}, keeping {current}");
            current
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn shape_codes() {
        assert_eq!(shape_from_code("0"), Some(KernelShape::Rect));
        assert_eq!(shape_from_code("1"), Some(KernelShape::Cross));
        assert_eq!(shape_from_code("2"), Some(KernelShape::Ellipse));
        assert_eq!(shape_from_code("3"), None);
        assert_eq!(shape_from_code("-1"), None);
        assert_eq!(shape_from_code("box"), None);
    }

    #[test]
    fn kernel_reprompts_on_invalid_shape() -> io::Result<()> {
        let mut p = prompt("7\nellipse\n1\n3\n");
        assert_eq!(p.read_kernel(10)?, Some((KernelShape::Cross, 3)));

        let out = String::from_utf8(p.into_output()).unwrap_or_default();
        assert_eq!(out.matches("Which type of kernel do you want?").count(), 3);
        assert!(out.contains("Invalid kernel type: \"7\""));
        assert!(out.ends_with("Enter the size of the kernel: "));

        Ok(())
    }

    #[test]
    fn kernel_invalid_radius_is_zero() -> io::Result<()> {
        let mut p = prompt("2\nbig\n0\n-4\n");
        assert_eq!(p.read_kernel(10)?, Some((KernelShape::Ellipse, 0)));
        assert_eq!(p.read_kernel(10)?, Some((KernelShape::Rect, 0)));
        Ok(())
    }

    #[test]
    fn kernel_end_of_input() -> io::Result<()> {
        assert_eq!(prompt("").read_kernel(10)?, None);
        assert_eq!(prompt("1\n").read_kernel(10)?, None);
        Ok(())
    }

    #[test]
    fn kernel_reprompts_on_oversized_radius() -> io::Result<()> {
        let mut p = prompt("0\n4611686018427387904\n99999999999999999999999\n11\n10\n");
        assert_eq!(p.read_kernel(10)?, Some((KernelShape::Rect, 10)));

        let out = String::from_utf8(p.into_output()).unwrap_or_default();
        assert_eq!(out.matches("Kernel size too large, the maximum is 10").count(), 3);
        assert_eq!(out.matches("Enter the size of the kernel: ").count(), 4);

        assert_eq!(prompt("2\n500\n").read_kernel(10)?, None);
        Ok(())
    }

    #[test]
    fn non_utf8_input_is_invalid_not_fatal() -> io::Result<()> {
        let raw = |bytes: &[u8]| Prompt::new(Cursor::new(bytes.to_vec()), Vec::new());

        assert_eq!(raw(b"\xff\xfe\n").read_menu_choice()?, MenuChoice::Unknown);
        assert_eq!(
            raw(b"\xc3\n2\n\xff7\n").read_kernel(10)?,
            Some((KernelShape::Ellipse, 0))
        );
        assert_eq!(
            raw(b"\x80\n\n").read_bounds(ThresholdBounds::new(5, 6))?,
            ThresholdBounds::new(5, 6)
        );
        Ok(())
    }

    #[test]
    fn menu_choice_end_of_input_exits() -> io::Result<()> {
        let mut p = prompt("4\n");
        assert_eq!(p.read_menu_choice()?, MenuChoice::Dilate);
        assert_eq!(p.read_menu_choice()?, MenuChoice::Exit);
        Ok(())
    }

    #[test]
    fn bounds_keep_current_on_blank_or_invalid() -> io::Result<()> {
        let current = ThresholdBounds::new(10, 200);

        assert_eq!(
            prompt("50\n180\n").read_bounds(current)?,
            ThresholdBounds::new(50, 180)
        );
        assert_eq!(
            prompt("\n300\n").read_bounds(current)?,
            ThresholdBounds::new(10, 200)
        );
        assert_eq!(prompt("").read_bounds(current)?, current);

        Ok(())
    }
}
