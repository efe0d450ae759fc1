//! Message monitor: a table of pending messages.  Up/Down move the
//! selection, Enter opens the selected message, Esc goes back.

use std::io;

use anyhow::Result;
use clap::Parser;
use imtui::{Engine, EngineConfig, FlexTable, FlexTableState, Frame, KeyCode, Modifier, Scene, Style};

const APP_NAME: &str = "imtui";

#[derive(Parser, Debug)]
#[command(name = "mm", about = "Browse pending messages")]
struct Cli {
    /// Append this many generated messages to the sample set.
    #[arg(long, default_value_t = 20)]
    extra: usize,
}

type Row = [String; 3];

fn sample_rows(extra: usize) -> Vec<Row> {
    let fixed = [
        ["CID", "To", "Value"],
        ["Kuba", "Kubuxu", "FIL"],
        ["Vyzo", "Vyzoooooooooooo", "libp2p"],
        [
            "Raul",
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit",
            "Upper Managment",
        ],
    ];
    fixed
        .into_iter()
        .map(|row| row.map(String::from))
        .chain((1..=extra).map(|i| [format!("bafy{i:04}"), format!("f0{}", 1000 + i), format!("{i} FIL")]))
        .collect()
}

/// Full view of one message.
struct MessageDetail {
    row: Row,
}

impl Scene for MessageDetail {
    fn render(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let plain = Style::default();
        let [cid, to, value] = &self.row;
        let (width, _) = frame.size();

        frame.label(0, 0, "[:skyblue:]Message", plain.add_modifier(Modifier::BOLD));
        frame.label_clipped(2, width, 2, &format!("[:gray:]CID    [:white:]{cid}"), plain);
        frame.label_clipped(2, width, 3, &format!("[:gray:]To     [:white:]{to}"), plain);
        frame.label_clipped(2, width, 4, &format!("[:gray:]Value  [:gold:]{value}"), plain);
        frame.label(0, 6, "[:gray:]Esc: back to the list", plain);
        Ok(())
    }
}

fn list_scene(rows: Vec<Row>) -> impl FnMut(&mut Frame<'_>) -> Result<()> + 'static {
    let mut state = FlexTableState::default();

    move |frame: &mut Frame<'_>| -> Result<()> {
        let (_, height) = frame.size();
        let hint = frame.config().status_bar_hint();

        let table = FlexTable::new(&rows, &[1, 3, 1])
            .header(true)
            .max_y(height.saturating_sub(1));
        frame.flex_table(table, &mut state)?;
        frame.label(0, height.saturating_sub(1), &format!("[:gray:]Enter: open | {hint}"), Style::default());

        if frame.key().map(|k| k.code) == Some(KeyCode::Enter) {
            if let Some(row) = rows.get(state.selected) {
                tracing::debug!(cid = %row[0], "opening message");
                frame.push_scene(MessageDetail { row: row.clone() });
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::load(APP_NAME);

    let mut engine = Engine::with_config(config)?;
    engine.push_scene(list_scene(sample_rows(cli.extra)));
    engine.run()?;
    Ok(())
}
