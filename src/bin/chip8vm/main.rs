// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chip8vm: runs a program headless, and prints the screen it leaves behind

use chip8vm::{
    error::{Error, Result},
    *,
};
use gumdrop::*;
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let mut state = match State::new(options) {
        Ok(state) => state,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };
    for result in &mut state {
        if let Err(e) = result {
            report(&e);
            state.finish();
            std::process::exit(1);
        }
    }
    state.finish();
    Ok(())
}

/// Prints a fatal error in bold red
fn report(e: &Error) {
    eprintln!("{}", e.bold().red());
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable live disassembly on stderr.")]
    pub debug: bool,
    #[options(short = "D", help = "Dump the registers when the run ends.")]
    pub dump: bool,
    #[options(
        short = "n",
        help = "Set the number of instructions to run.",
        default = "1000",
        meta = "N"
    )]
    pub steps: usize,
    #[options(
        short = "i",
        help = "Set the instructions-per-second rate. If unspecified, run unthrottled.",
        meta = "IPS"
    )]
    pub speed: Option<u64>,
    #[options(short = "r", help = "Seed the random number generator.", meta = "SEED")]
    pub seed: Option<u64>,
    #[options(
        short = "p",
        help = "Hold these keys for the whole run (1234/qwer/asdf/zxcv).",
        meta = "KEYS"
    )]
    pub press: String,
}

#[derive(Debug)]
struct State {
    pub engine: Engine,
    pub remaining: usize,
    pub rate: Option<Duration>,
    pub dump: bool,
    pub frames: usize,
    pub beeps: usize,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut engine = match options.seed {
            Some(seed) => Engine::with_random(Box::new(StdRng::seed_from_u64(seed))),
            None => Engine::new(),
        };
        engine.flags.debug = options.debug;
        engine.load_program(&options.file)?;

        let keymap = KeyMap::default();
        for key in options.press.chars() {
            if keymap.lookup(key).is_none() {
                eprintln!("{}", format_args!("ignoring unmapped key {key:?}").yellow());
                continue;
            }
            keymap.handle(&mut engine.keypad(), key, true)?;
        }

        Ok(State {
            engine,
            remaining: options.steps,
            rate: options
                .speed
                .filter(|&ips| ips > 0)
                .map(|ips| Duration::from_nanos(1_000_000_000 / ips)),
            dump: options.dump,
            frames: 0,
            beeps: 0,
            ft: Instant::now(),
        })
    }

    /// Runs one instruction, then services the screen and speaker flags
    fn tick(&mut self) -> Result<()> {
        self.engine.step()?;
        if self.engine.take_draw() {
            self.frames += 1;
        }
        if self.engine.take_beep() {
            self.beeps += 1;
            eprint!("\x07");
        }
        Ok(())
    }

    fn wait_for_next_step(&mut self) {
        if let Some(rate) = self.rate {
            std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
            self.ft += rate;
        }
    }

    /// Prints the screen and a summary of the run
    fn finish(&self) {
        print!("{}", self.engine.state().screen());
        eprintln!(
            "{}",
            format_args!(
                "{} instructions, {} frames, {} beeps",
                self.engine.cycle(),
                self.frames,
                self.beeps
            )
            .bright_black()
        );
        if self.dump {
            self.engine.dump();
        }
    }
}

impl Iterator for State {
    type Item = Result<()>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.wait_for_next_step();
        Some(self.tick())
    }
}
