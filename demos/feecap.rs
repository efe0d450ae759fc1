//! Fee-cap prompt: shows the fee a message needs and lets the user edit the
//! price they are willing to pay.
//!
//! Keys: digits and `.` edit the price, `s` uses the required fee, `+`/`-`
//! scale the price by 1.1, Esc or Ctrl+c quit.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use imtui::{filter_decimal, typed_char, Color, Engine, EngineConfig, Frame, Modifier, Style};

const APP_NAME: &str = "imtui";

#[derive(Parser, Debug)]
#[command(name = "feecap", about = "Pick a maximum fee for a message")]
struct Cli {
    /// Current base fee in nFIL.
    #[arg(long, default_value_t = 2.172)]
    base_fee: f64,

    /// Gas limit of the message.
    #[arg(long, default_value_t = 1_000_000_000.0)]
    gas_limit: f64,

    /// Configured maximum fee in nFIL.
    #[arg(long, default_value_t = 0.07e9)]
    max_fee: f64,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Save the current key bindings to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

/// How the typed price compares with the required fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Safe,
    Low,
    TooLow,
    Invalid,
}

impl Verdict {
    fn judge(price: &str, required: f64) -> Self {
        match price.parse::<f64>() {
            Err(_) => Verdict::Invalid,
            Ok(p) if p >= required => Verdict::Safe,
            Ok(p) if p >= required / 2.0 - 1.0 => Verdict::Low,
            Ok(_) => Verdict::TooLow,
        }
    }

    fn text(self) -> &'static str {
        match self {
            Verdict::Safe => " SAFE",
            Verdict::Low => " low",
            Verdict::TooLow => " too low",
            Verdict::Invalid => " invalid price",
        }
    }

    fn style(self) -> Style {
        let fg = match self {
            Verdict::Safe => Color::Green,
            Verdict::Low => Color::Rgb(0xff, 0xa5, 0x00),
            Verdict::TooLow => Color::LightRed,
            Verdict::Invalid => Color::Red,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }
}

/// Price change requested by a shortcut key, applied before the edit field
/// sees the key.
fn shortcut(price: &mut String, key: char, required: f64) {
    let current = price.parse::<f64>().unwrap_or(0.0);
    let next = match key {
        's' | 'S' => required,
        '+' => current * 1.1,
        '-' => current / 1.1,
        _ => return,
    };
    *price = format!("{next:.1}");
}

fn fee_scene(cli: &Cli) -> impl FnMut(&mut Frame<'_>) -> Result<()> + 'static {
    let base_fee = cli.base_fee;
    let max_fee = cli.max_fee;
    let required = cli.gas_limit * base_fee;
    let mut price = format!("{max_fee:.0}");

    move |frame: &mut Frame<'_>| -> Result<()> {
        let plain = Style::default();
        let hint = frame.config().status_bar_hint();

        frame.label(0, 0, "Fee of the message is too low.", plain);
        frame.label(0, 1, &format!("Current Base Fee is: {base_fee:.1} nFIL"), plain);
        frame.label(0, 2, &format!("Your configured maximum fee is: {max_fee:.1} nFIL"), plain);
        let w = frame.label(0, 3, &format!("Required maximum fee for the message: {required:.1} nFIL"), plain);
        frame.label(w, 3, "    Press [:yellow:]S[:white:] to use it", plain);

        if let Some(c) = frame.key().and_then(typed_char) {
            shortcut(&mut price, c, required);
        }

        let row = 4;
        let mut w = frame.label(0, row, "Current Price: ", plain);
        let field = Style::default().fg(Color::White).bg(Color::Black);
        w += frame.edit_field_filtered(w, row, 14, &mut price, filter_decimal, field);
        w += frame.label(w, row, " nFIL", plain);

        let verdict = Verdict::judge(&price, required);
        frame.label(w, row, verdict.text(), verdict.style());
        if verdict != Verdict::Safe {
            tracing::trace!(%price, ?verdict, "price below the required fee");
        }

        let (_, height) = frame.size();
        frame.label(0, height.saturating_sub(1), &format!("[:gray:]{hint}"), plain);
        Ok(())
    }
}

fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        // The UI owns stdout.
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_ref())?;

    let config = EngineConfig::load(APP_NAME);
    if cli.write_config {
        let path = config.save(APP_NAME)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let mut engine = Engine::with_config(config)?;
    engine.set_scene(fee_scene(&cli));
    engine.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_thresholds() {
        let required = 100.0;
        assert_eq!(Verdict::judge("100", required), Verdict::Safe);
        assert_eq!(Verdict::judge("250.5", required), Verdict::Safe);
        assert_eq!(Verdict::judge("49", required), Verdict::Low);
        assert_eq!(Verdict::judge("48.9", required), Verdict::TooLow);
        assert_eq!(Verdict::judge("", required), Verdict::Invalid);
        assert_eq!(Verdict::judge("1.2.3", required), Verdict::Invalid);
    }

    #[test]
    fn shortcuts_rewrite_the_price() {
        let mut price = "100".to_string();
        shortcut(&mut price, '+', 5.0);
        assert_eq!(price, "110.0");
        shortcut(&mut price, '-', 5.0);
        assert_eq!(price, "100.0");
        shortcut(&mut price, 's', 2172.0);
        assert_eq!(price, "2172.0");
        shortcut(&mut price, 'x', 1.0);
        assert_eq!(price, "2172.0");
    }
}
