use std::io::{BufRead, Write};

use crate::{
    effects::EffectKind, error::PickerError, prompt::Prompt, session::Session, viewer::Viewer,
};

const MENU: &str = "Effect menu\n\n\
                    Choose an option:\n\
                    0 - Exit\n\
                    1 - Clear effects\n\
                    2 - Show current effects\n\
                    3 - Apply erosion\n\
                    4 - Apply dilation\n\
                    5 - Apply closing\n\
                    6 - Apply opening\n\
                    7 - Change threshold values\n\
                    8 - Automatic threshold (Otsu)\n\n";

const ADJUST_HINT: &str = "Enter the new threshold values (blank keeps the current value).\n";

/// A parsed menu option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// 0: leave the loop.
    Exit,
    /// 1: restore the original image and empty the effect log.
    ClearEffects,
    /// 2: print the effect log.
    ShowEffects,
    /// 3
    Erode,
    /// 4
    Dilate,
    /// 5
    Close,
    /// 6
    Open,
    /// 7: adjust the threshold bounds by hand.
    ChangeThreshold,
    /// 8: pick the bounds with Otsu's method.
    AutoThreshold,
    /// Anything else, including non-numeric input.
    Unknown,
}

impl MenuChoice {
    /// Parse a line of user input.
    pub fn parse(line: &str) -> Self {
        match line.trim().parse::<i64>() {
            Ok(0) => MenuChoice::Exit,
            Ok(1) => MenuChoice::ClearEffects,
            Ok(2) => MenuChoice::ShowEffects,
            Ok(3) => MenuChoice::Erode,
            Ok(4) => MenuChoice::Dilate,
            Ok(5) => MenuChoice::Close,
            Ok(6) => MenuChoice::Open,
            Ok(7) => MenuChoice::ChangeThreshold,
            Ok(8) => MenuChoice::AutoThreshold,
            _ => MenuChoice::Unknown,
        }
    }

    /// The morphological transform this choice applies, if any.
    pub fn effect(self) -> Option<EffectKind> {
        match self {
            MenuChoice::Erode => Some(EffectKind::Erosion),
            MenuChoice::Dilate => Some(EffectKind::Dilation),
            MenuChoice::Close => Some(EffectKind::Closing),
            MenuChoice::Open => Some(EffectKind::Opening),
            _ => None,
        }
    }
}

/// Run one menu choice against the session.
pub fn dispatch<R, W>(
    choice: MenuChoice,
    session: &mut Session,
    prompt: &mut Prompt<R, W>,
) -> Result<(), PickerError>
where
    R: BufRead,
    W: Write,
{
    if let Some(kind) = choice.effect() {
        match prompt.read_kernel(session.max_radius())? {
            Some((shape, radius)) => session.apply(kind, shape, radius)?,
            None => log::warn!("input ended before the kernel was given, {kind} skipped"),
        }
        return Ok(());
    }

    match choice {
        MenuChoice::ClearEffects => session.clear_effects()?,
        MenuChoice::ShowEffects => {
            prompt.say(&format!("{}\n", session.effects().render()))?;
        }
        MenuChoice::ChangeThreshold => {
            prompt.say(ADJUST_HINT)?;
            let bounds = prompt.read_bounds(session.bounds())?;
            session.set_bounds(bounds)?;
        }
        MenuChoice::AutoThreshold => {
            let bounds = session.auto_threshold()?;
            prompt.say(&format!("{bounds}\n"))?;
        }
        _ => {}
    }

    Ok(())
}

/// Show the menu until the user exits.
///
/// The binary view is handed to the viewer once before the first menu and again
/// after every choice.
pub fn run<R, W>(
    session: &mut Session,
    prompt: &mut Prompt<R, W>,
    viewer: &mut dyn Viewer,
) -> Result<(), PickerError>
where
    R: BufRead,
    W: Write,
{
    viewer.show(session.binary(), session.bounds())?;

    loop {
        prompt.say(MENU)?;
        let choice = prompt.read_menu_choice()?;
        if choice == MenuChoice::Exit {
            break;
        }

        log::debug!("menu choice: {choice:?}");
        dispatch(choice, session, prompt)?;

        session.recompute()?;
        viewer.show(session.binary(), session.bounds())?;
    }

    Ok(())
}
