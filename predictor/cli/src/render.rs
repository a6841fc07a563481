//! Terminal rendering of prediction views
//!
//! Colours come from the core's theme tokens. Entrances are rendered as a
//! brightness fade on the heading line; reduced motion prints it settled.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};

use predictor_core::parameters::ParameterInputModel;
use predictor_core::presenter::{GradientTheme, Presentation};
use predictor_core::{AdaptedEntrance, Pollutant, PredictionMode, ResultView, ThemeToken};

/// Frame rate of heading fades
const FADE_FPS: u32 = 30;

/// Spinner glyphs, one per tick
pub const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Interval between spinner ticks
pub const SPINNER_TICK: Duration = Duration::from_millis(80);

fn color((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// Scale a colour towards black by `opacity`
fn dim((r, g, b): (u8, u8, u8), opacity: f32) -> (u8, u8, u8) {
    let scale = |c: u8| (f32::from(c) * opacity.clamp(0.0, 1.0)).round() as u8;
    (scale(r), scale(g), scale(b))
}

/// Page heading
pub fn page_header(out: &mut impl Write, mode: PredictionMode) -> io::Result<()> {
    let subtitle = match mode {
        PredictionMode::Date => "Weather classification by date",
        PredictionMode::Parameters => "Air quality classification by pollutant readings",
    };
    queue!(
        out,
        SetAttribute(Attribute::Bold),
        Print("Jakarta Weather & Air Quality Prediction\n"),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{subtitle}\n\n")),
        ResetColor
    )?;
    out.flush()
}

/// Pollutant readings with their slider colour bands
pub fn parameter_summary(out: &mut impl Write, model: &ParameterInputModel) -> io::Result<()> {
    for pollutant in Pollutant::ALL {
        let value = model.get(pollutant);
        let level = model.level(pollutant);
        queue!(
            out,
            Print(format!("  {:<6}", pollutant.label())),
            SetForegroundColor(color(level.rgb())),
            Print(format!("{value:>7.1}")),
            ResetColor,
            SetForegroundColor(Color::DarkGrey),
            Print(format!(" {:<6} {}\n", pollutant.unit(), pollutant.description())),
            ResetColor
        )?;
    }
    queue!(out, Print("\n"))?;
    out.flush()
}

/// Redraw the spinner line
pub fn spinner_frame(out: &mut impl Write, tick: usize, label: &str) -> io::Result<()> {
    let glyph = SPINNER_FRAMES[tick % SPINNER_FRAMES.len()];
    execute!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(format!("{glyph} {label}"))
    )
}

/// Clear the spinner line
pub fn clear_line(out: &mut impl Write) -> io::Result<()> {
    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))
}

/// Print a line, fading it in unless the entrance is reduced
pub async fn fade_in_line(
    out: &mut impl Write,
    text: &str,
    rgb: (u8, u8, u8),
    entrance: AdaptedEntrance,
) -> io::Result<()> {
    let frames = entrance.frames(FADE_FPS);
    let mut ticker = tokio::time::interval(Duration::from_secs(1) / FADE_FPS);

    for frame in frames {
        ticker.tick().await;
        execute!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetAttribute(Attribute::Bold),
            SetForegroundColor(color(dim(rgb, frame.opacity))),
            Print(text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
    }
    queue!(out, Print("\n"))?;
    out.flush()
}

fn gradient_bar(out: &mut impl Write, gradient: GradientTheme) -> io::Result<()> {
    let base = gradient.from.rgb();
    let strength = f32::from(gradient.opacity_percent) / 100.0;
    let cells = 40u8;
    for i in 0..cells {
        // Fade from the tinted colour into black across the bar
        let t = 1.0 - f32::from(i) / f32::from(cells);
        queue!(out, SetForegroundColor(color(dim(base, strength * 2.5 * t))), Print("▀"))?;
    }
    queue!(out, ResetColor, Print("\n"))
}

/// Render a finished view
pub async fn result_view(out: &mut impl Write, view: &ResultView) -> io::Result<()> {
    match view {
        ResultView::Empty => Ok(()),
        ResultView::Loading { label, .. } => {
            queue!(out, Print(format!("{label}\n")))?;
            out.flush()
        }
        ResultView::Failed { message } => {
            queue!(
                out,
                SetForegroundColor(color(ThemeToken::Red.rgb())),
                Print(format!("✗ {message}\n")),
                ResetColor
            )?;
            out.flush()
        }
        ResultView::Ready(presentation) => presentation_card(out, presentation).await,
    }
}

async fn presentation_card(out: &mut impl Write, p: &Presentation) -> io::Result<()> {
    gradient_bar(out, p.gradient)?;
    queue!(
        out,
        SetForegroundColor(color(p.icon.tone.rgb())),
        Print(format!("{} ", p.icon.glyph.symbol())),
        ResetColor,
        SetAttribute(Attribute::Bold),
        Print(format!("{}\n", p.title)),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{}\n\n", p.description)),
        ResetColor
    )?;
    out.flush()?;

    fade_in_line(out, &p.result_text, p.icon.tone.rgb(), p.entrance).await?;

    queue!(
        out,
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{}\n", p.basis_note)),
        ResetColor
    )?;

    if let Some(critical) = &p.critical {
        queue!(
            out,
            Print("\nCritical parameters: "),
            SetAttribute(Attribute::Bold),
            Print(critical.parameters.join(", ")),
            SetAttribute(Attribute::Reset)
        )?;
        if let Some(max) = critical.max_value {
            queue!(out, Print(format!(" (max {max:.1})")))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()?;

    if let Some(panel) = &p.recommendation {
        queue!(out, Print("\n"))?;
        fade_in_line(out, panel.bundle.title, panel.bundle.theme.rgb(), panel.entrance).await?;
        queue!(out, Print(format!("{}\n", panel.bundle.description)))?;
        for action in panel.bundle.actions {
            queue!(
                out,
                SetForegroundColor(color(panel.bundle.theme.rgb())),
                Print("  • "),
                ResetColor,
                Print(format!("{action}\n"))
            )?;
        }
        queue!(
            out,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("\n{}\n", panel.note)),
            ResetColor
        )?;
    }
    out.flush()
}
