pub mod charting;
pub mod screen;

use flick::{
    metrics::{SessionSummary, Tier},
    time_series::reaction_series,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const TARGET_COLOR: Color = Color::Rgb(200, 255, 0);

pub fn ui(app: &mut App, f: &mut Frame) {
    screen::current_screen(app.session.phase()).render(app, f);
}

/// Whole seconds left, rounded up, as MM:SS.
pub fn format_time(remaining_ms: u64) -> String {
    let total_secs = remaining_ms.div_ceil(1000);
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn timer_color(remaining_ms: u64) -> Color {
    let secs = remaining_ms as f64 / 1000.0;
    if secs > 45.0 {
        Color::White
    } else if secs > 14.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::S => Color::Rgb(255, 215, 0),
        Tier::A => Color::Cyan,
        Tier::B => Color::Green,
        Tier::C => Color::Yellow,
        Tier::D => Color::Rgb(255, 107, 107),
    }
}

/// Label/value pairs shown on the results screen and by `--summarize`.
pub fn summary_rows(summary: &SessionSummary, missed: Option<usize>) -> Vec<(&'static str, String)> {
    let mut rows = vec![("Targets Hit", summary.total_clicks.to_string())];
    if let Some(missed) = missed {
        rows.push(("Missed Targets", missed.to_string()));
    }
    rows.extend([
        (
            "Average Reaction Time",
            format!("{}ms", summary.average_reaction_time_ms),
        ),
        (
            "Median Reaction Time",
            format!("{}ms", summary.median_reaction_time_ms),
        ),
        (
            "Fastest Reaction",
            format!("{}ms", summary.min_reaction_time_ms),
        ),
        (
            "Slowest Reaction",
            format!("{}ms", summary.max_reaction_time_ms),
        ),
        (
            "Click Accuracy",
            format!("{}%", summary.accuracy_percentage),
        ),
        ("Clicks Per Second", format!("{:.2}", summary.clicks_per_second)),
        ("Consistency Score", summary.consistency_score.to_string()),
        (
            "Standard Deviation",
            format!("{}ms", summary.standard_deviation_ms),
        ),
    ]);
    rows
}

fn sound_label(app: &App) -> &'static str {
    if app.audio.settings.is_muted() {
        "sound off"
    } else {
        "sound on"
    }
}

fn render_footer(app: &App, f: &mut Frame, area: Rect, keys: &str) {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut lines = vec![];
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Cyan),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("{keys}  ({})", sound_label(app)),
        dim,
    )));
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

pub fn render_start(app: &mut App, f: &mut Frame) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let secs = app.session.config().duration_ms / 1000;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(8),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(f.area());

    let selected = app.session.difficulty();
    let mut selector = vec![Span::styled("DIFFICULTY  ", bold)];
    for (key, difficulty) in [
        ('1', flick::session::Difficulty::Easy),
        ('2', flick::session::Difficulty::Medium),
        ('3', flick::session::Difficulty::Hard),
    ] {
        let text = format!(" [{key}] {} ", difficulty.to_string().to_uppercase());
        let style = if difficulty == selected {
            Style::default().fg(Color::Black).bg(Color::Cyan).patch(bold)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        selector.push(Span::styled(text, style));
    }

    let lines = vec![
        Line::from(Span::styled(
            "REACTION TEST",
            Style::default().fg(Color::Cyan).patch(bold),
        )),
        Line::from(Span::styled(
            "NEURAL SPEED CHALLENGE",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(format!(
            "Click targets as fast as possible in {secs} seconds"
        )),
        Line::from(""),
        Line::from(selector),
        Line::from(""),
        Line::from(Span::styled(
            "Press SPACE or ENTER to begin",
            Style::default().fg(Color::Yellow),
        )),
    ];

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[1],
    );
    render_footer(app, f, chunks[3], "(1/2/3) difficulty  (m)ute  (esc) quit");
}

pub fn render_play(app: &mut App, f: &mut Frame) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(f.area());

    let hud = Layout::default()
        .direction(Direction::Horizontal)
        .horizontal_margin(1)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    let remaining = app.session.remaining_ms();
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("TARGETS HIT: ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                app.session.hits().to_string(),
                Style::default().fg(Color::Green).patch(bold),
            ),
        ])),
        hud[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            format_time(remaining),
            Style::default().fg(timer_color(remaining)).patch(bold),
        ))
        .alignment(Alignment::Center),
        hud[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("MISSED: ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                app.session.missed().to_string(),
                Style::default().fg(Color::Rgb(255, 107, 107)).patch(bold),
            ),
        ]))
        .alignment(Alignment::Right),
        hud[2],
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::DIM));
    let inner = block.inner(chunks[1]);
    f.render_widget(block, chunks[1]);
    app.arena_area = inner;

    let config = app.session.config();
    let arena = config.arena;
    if !arena.fits_hit_radius(inner, config.hit_radius_px) {
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled("Terminal too small", bold)),
                Line::from("Enlarge the window to see targets"),
            ])
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let target_style = Style::default().fg(TARGET_COLOR).patch(bold);
    let buf = f.buffer_mut();
    for target in app.session.targets() {
        let cells = arena.cells_within(inner, target.position, config.hit_radius_px);
        for (col, row) in cells {
            if let Some(cell) = buf.cell_mut((col, row)) {
                cell.set_symbol("●").set_style(target_style);
            }
        }
    }
}

pub fn render_results(app: &mut App, f: &mut Frame) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let summary = app.session.summary();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // title + tier
            Constraint::Min(1),    // stats and chart
            Constraint::Length(2), // footer
        ])
        .split(f.area());

    let keys = "(r)estart  (h)ome  (e)xport  (m)ute  (esc) quit";

    let Some(summary) = summary else {
        let lines = vec![
            Line::from(Span::styled("TEST COMPLETE!", bold)),
            Line::from(""),
            Line::from("No targets were hit. Try again!"),
        ];
        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            chunks[0],
        );
        render_footer(app, f, chunks[2], keys);
        return;
    };

    let tier = summary.performance_tier;
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled("TEST COMPLETE!", bold)),
            Line::from(""),
            Line::from(Span::styled(
                tier.label(),
                Style::default().fg(tier_color(tier)).patch(bold),
            )),
        ])
        .alignment(Alignment::Center),
        chunks[0],
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(10)])
        .split(chunks[1]);

    let rows = summary_rows(&summary, Some(app.session.missed()))
        .into_iter()
        .map(|(label, value)| {
            let style = if label == "Missed Targets" {
                Style::default().fg(Color::Rgb(255, 107, 107))
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(label).style(Style::default().add_modifier(Modifier::DIM)),
                Cell::from(value).style(style.patch(bold)),
            ])
        })
        .collect::<Vec<Row>>();
    let table = Table::new(rows, [Constraint::Length(24), Constraint::Length(10)]);
    f.render_widget(table, body[0]);

    let series = reaction_series(app.session.events());
    let session_secs = app.session.config().duration_ms as f64 / 1000.0;
    let (x_max, y_max) = charting::compute_chart_params(&series, session_secs);
    let data = series
        .into_iter()
        .map(<(f64, f64)>::from)
        .collect::<Vec<(f64, f64)>>();
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Scatter)
        .data(&data)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled("0", bold),
                    Span::styled(charting::format_label(x_max), bold),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("ms")
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", bold),
                    Span::styled(charting::format_label(y_max), bold),
                ]),
        );
    f.render_widget(chart, body[1]);

    render_footer(app, f, chunks[2], keys);
}
