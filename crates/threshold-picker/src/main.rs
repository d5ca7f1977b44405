use argh::FromArgs;
use std::{path::PathBuf, process::ExitCode};

use threshold_picker::{
    menu,
    prompt::Prompt,
    viewer::{HeadlessViewer, RerunViewer, Viewer},
    PickerError, Session, ThresholdBounds, WINDOW_TITLE,
};

#[derive(FromArgs)]
/// Tune a dual threshold on an image and apply morphological operations to it
struct Args {
    /// path to an input image
    #[argh(positional)]
    image_path: PathBuf,

    /// initial lower threshold value (default: 0)
    #[argh(option, default = "0")]
    lower: u8,

    /// initial upper threshold value (default: 255)
    #[argh(option, default = "255")]
    upper: u8,

    /// do not spawn the Rerun viewer, only log the binary view
    #[argh(switch)]
    headless: bool,
}

const USAGE_EXIT: u8 = 2;

fn parse_args() -> Result<Args, ExitCode> {
    let argv = std::env::args().collect::<Vec<_>>();
    let cmd = argv.first().map(String::as_str).unwrap_or("threshold-picker");
    let rest = argv.iter().skip(1).map(String::as_str).collect::<Vec<_>>();

    Args::from_args(&[cmd], &rest).map_err(|early_exit| match early_exit.status {
        Ok(()) => {
            println!("{}", early_exit.output);
            ExitCode::SUCCESS
        }
        Err(()) => {
            eprintln!("{}", early_exit.output);
            eprintln!("usage: {cmd} <filename>");
            ExitCode::from(USAGE_EXIT)
        }
    })
}

fn run(args: Args) -> Result<(), PickerError> {
    let bounds = ThresholdBounds::new(args.lower, args.upper);
    let mut session = Session::open(&args.image_path, bounds)?;

    let mut viewer: Box<dyn Viewer> = if args.headless {
        Box::new(HeadlessViewer)
    } else {
        Box::new(RerunViewer::spawn(WINDOW_TITLE)?)
    };

    let stdin = std::io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), std::io::stdout());

    menu::run(&mut session, &mut prompt, viewer.as_mut())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
