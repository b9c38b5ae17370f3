use chd_model::{
    highlight, Field, HistoryRecord, HistoryStats, ResultReport, RiskClass, RiskInput, Severity,
    Sex,
};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Tabs, Wrap,
    },
    Frame,
};

use crate::app::App;
use crate::model::{ActiveTab, FormSnapshot, Slot};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const LABEL_WIDTH: usize = 26;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::High => Color::Red,
        Severity::Moderate => Color::Yellow,
        Severity::None => Color::Reset,
    }
}

fn class_color(class: RiskClass) -> Color {
    match class {
        RiskClass::HighRisk => Color::Red,
        RiskClass::LowRisk => Color::Green,
    }
}

/// Local wall-clock rendering of a record timestamp.
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub fn render(app: &App, frame: &mut Frame) {
    let screen = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Body
            Constraint::Length(2), // Status + hints
        ])
        .split(screen);

    HeaderView::render(frame, layout[0], &HeaderProps {
        active_tab: app.state.active_tab,
        gateway: app.controller.gateway_name(),
        history_len: app.controller.history().len(),
    });

    match app.state.active_tab {
        ActiveTab::Form => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(layout[1]);
            let snapshot = app.controller.snapshot();
            FormView::render(frame, body[0], &FormProps {
                snapshot,
                selected: app.state.selected_slot,
                editing: app.state.input_mode.then_some(app.state.input_buffer.as_str()),
            });
            ResultView::render(frame, body[1], &ResultProps {
                loading: snapshot.is_loading(),
                report: snapshot.report(),
                ticks: app.state.ticks,
            });
        }
        ActiveTab::History => {
            let records: Vec<&HistoryRecord> = app.controller.history().newest_first().collect();
            HistoryView::render(frame, layout[1], &HistoryProps {
                records,
                selected: app.state.selected_record,
                stats: app.controller.history().stats(),
            });
        }
    }

    FooterView::render(frame, layout[2], &FooterProps {
        status: app.state.status.as_deref(),
        editing: app.state.input_mode,
        active_tab: app.state.active_tab,
    });

    if app.state.confirm_clear {
        ConfirmView::render(frame, screen, app.controller.history().len());
    }
    if app.state.show_help {
        HelpView::render(frame, screen);
    }
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// --- HeaderView ---
pub struct HeaderView;

pub struct HeaderProps {
    pub active_tab: ActiveTab,
    pub gateway: &'static str,
    pub history_len: usize,
}

impl HeaderView {
    pub fn render(frame: &mut Frame, area: Rect, props: &HeaderProps) {
        let selected = match props.active_tab {
            ActiveTab::Form => 0,
            ActiveTab::History => 1,
        };
        let titles = vec![
            Line::from(" Risk Form "),
            Line::from(format!(" History ({}) ", props.history_len)),
        ];
        let tabs = Tabs::new(titles)
            .select(selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" CHD Risk Assessment ")
                    .title(
                        Title::from(format!(" predictor: {} ", props.gateway))
                            .position(Position::Bottom)
                            .alignment(Alignment::Right),
                    ),
            )
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }
}

// --- FormView ---
pub struct FormView;

pub struct FormProps<'a> {
    pub snapshot: &'a FormSnapshot,
    pub selected: usize,
    pub editing: Option<&'a str>,
}

impl FormView {
    pub fn render(frame: &mut Frame, area: Rect, props: &FormProps) {
        let form = &props.snapshot.form;
        let items: Vec<ListItem> = Slot::ALL
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                let is_selected = idx == props.selected;
                let mut lines = vec![Self::row(props, *slot, is_selected)];
                if let Slot::Input(field) = slot {
                    if let Some(err) = props.snapshot.errors.for_field(*field) {
                        lines.push(Line::from(Span::styled(
                            format!("    ! {err}"),
                            Style::default().fg(Color::Red),
                        )));
                    }
                }
                ListItem::new(lines)
            })
            .collect();

        let title = if form.is_smoking() { " Patient " } else { " Patient (non-smoker) " };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(props.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn row<'a>(props: &FormProps<'a>, slot: Slot, is_selected: bool) -> Line<'a> {
        let form = &props.snapshot.form;
        let label = format!("{:<width$}", slot.label(), width = LABEL_WIDTH);

        let (value, style) = match slot {
            Slot::Input(field) => {
                let raw = form.raw(field);
                let severity = props.snapshot.highlights.get(field);
                let mut style = Style::default().fg(severity_color(severity));
                if severity == Severity::High {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if !form.is_enabled(field) {
                    ("n/a".to_string(), Style::default().fg(Color::DarkGray))
                } else if field.is_toggle() {
                    (format!("< {} >", field.display_value(raw)), style)
                } else if raw.is_empty() {
                    let hint = if field.is_required() { "(required)" } else { "(optional)" };
                    (hint.to_string(), Style::default().fg(Color::DarkGray))
                } else {
                    let unit = field.unit().map(|u| format!(" {u}")).unwrap_or_default();
                    (format!("{raw}{unit}"), style)
                }
            }
            Slot::Measure(m) => {
                let raw = form.measurement(m);
                if raw.is_empty() {
                    ("(for BMI)".to_string(), Style::default().fg(Color::DarkGray))
                } else {
                    (raw.to_string(), Style::default())
                }
            }
        };

        let value_span = match props.editing {
            Some(buffer) if is_selected => Span::styled(
                format!("{buffer}█"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            _ => Span::styled(value, style),
        };
        let marker = if is_selected { "> " } else { "  " };
        Line::from(vec![Span::raw(marker), Span::raw(label), value_span])
    }
}

// --- ResultView ---
pub struct ResultView;

pub struct ResultProps {
    pub loading: bool,
    pub report: Option<ResultReport>,
    pub ticks: u64,
}

impl ResultView {
    pub fn render(frame: &mut Frame, area: Rect, props: &ResultProps) {
        let block = Block::default().borders(Borders::ALL).title(" Result ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if props.loading {
            let frame_idx = (props.ticks % SPINNER.len() as u64) as usize;
            let text = Line::from(vec![
                Span::styled(SPINNER[frame_idx], Style::default().fg(Color::Cyan)),
                Span::raw(" Predicting..."),
            ]);
            frame.render_widget(Paragraph::new(text), inner);
            return;
        }

        match &props.report {
            None => {
                let hint = Paragraph::new("Fill in the form and press `s` to predict.")
                    .style(Style::default().fg(Color::DarkGray))
                    .wrap(Wrap { trim: true });
                frame.render_widget(hint, inner);
            }
            Some(ResultReport::Failure { message, detail }) => {
                let lines = vec![
                    Line::from(Span::styled(
                        *message,
                        Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(detail.clone(), Style::default().fg(Color::DarkGray))),
                ];
                frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
            }
            Some(report) => Self::render_success(frame, inner, report),
        }
    }

    fn render_success(frame: &mut Frame, area: Rect, report: &ResultReport) {
        let ResultReport::Success { classification, label, summary, bar_percent, probability_text, .. } = report
        else {
            return;
        };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Label
                Constraint::Length(3), // Summary
                Constraint::Length(1), // Gauge
                Constraint::Min(1),    // Factors
            ])
            .split(area);

        let color = class_color(*classification);
        frame.render_widget(
            Paragraph::new(Span::styled(*label, Style::default().fg(color).add_modifier(Modifier::BOLD))),
            layout[0],
        );
        frame.render_widget(Paragraph::new(summary.clone()).wrap(Wrap { trim: true }), layout[1]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio((bar_percent / 100.0).clamp(0.0, 1.0))
            .label(format!("Risk Probability {probability_text}"));
        frame.render_widget(gauge, layout[2]);

        let factors: Vec<ListItem> = report
            .factors()
            .iter()
            .map(|f| {
                let (arrow, color) = if f.increases { ("▲", Color::Red) } else { ("▼", Color::Green) };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{arrow} "), Style::default().fg(color)),
                    Span::raw(f.name.clone()),
                    Span::styled(format!("  {}", f.tag), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        if !factors.is_empty() {
            let list = List::new(factors).block(Block::default().borders(Borders::TOP).title(" Risk Factors "));
            frame.render_widget(list, layout[3]);
        }
    }
}

// --- HistoryView ---
pub struct HistoryView;

pub struct HistoryProps<'a> {
    /// Newest first.
    pub records: Vec<&'a HistoryRecord>,
    pub selected: usize,
    pub stats: HistoryStats,
}

impl HistoryView {
    pub fn render(frame: &mut Frame, area: Rect, props: &HistoryProps) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(10)])
            .split(columns[1]);

        let block = Block::default().borders(Borders::ALL).title(" Predictions ");
        if props.records.is_empty() {
            let empty = Paragraph::new("No predictions yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, columns[0]);
        } else {
            let items: Vec<ListItem> = props
                .records
                .iter()
                .map(|r| {
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("#{:<4}", r.id)),
                        Span::raw(format!("{}  ", format_timestamp(r.timestamp))),
                        Span::styled(
                            format!("{:<10}", r.result.classification.label()),
                            Style::default().fg(class_color(r.result.classification)),
                        ),
                        Span::raw(format!("{:>6.1}%", r.result.probability * 100.0)),
                    ]))
                })
                .collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let selected = props.selected.min(props.records.len() - 1);
            let mut state = ListState::default().with_selected(Some(selected));
            frame.render_stateful_widget(list, columns[0], &mut state);
        }

        let detail = props
            .records
            .get(props.selected)
            .map(|r| Self::detail_lines(r))
            .unwrap_or_default();
        frame.render_widget(
            Paragraph::new(detail).block(Block::default().borders(Borders::ALL).title(" Details ")),
            right[0],
        );

        frame.render_widget(
            Paragraph::new(Self::stats_lines(&props.stats))
                .block(Block::default().borders(Borders::ALL).title(" Statistics ")),
            right[1],
        );
    }

    fn detail_lines(record: &HistoryRecord) -> Vec<Line<'static>> {
        let levels = highlight(&record.input);
        let mut lines = vec![Line::from(vec![
            Span::styled(
                record.result.classification.label(),
                Style::default()
                    .fg(class_color(record.result.classification))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {:.1}%", record.result.probability * 100.0)),
        ])];
        for (field, value) in input_rows(&record.input) {
            lines.push(Line::from(vec![
                Span::raw(format!("{:<width$}", field.label(), width = LABEL_WIDTH)),
                Span::styled(value, Style::default().fg(severity_color(levels.get(field)))),
            ]));
        }
        lines
    }

    fn stats_lines(stats: &HistoryStats) -> Vec<Line<'static>> {
        vec![
            Line::from(format!("Total predictions   {}", stats.total_predictions)),
            Line::from(format!(
                "High / low risk     {} / {}  ({:.1}% high)",
                stats.high_risk_count, stats.low_risk_count, stats.high_risk_percentage
            )),
            Line::from(format!("Average age         {:.1}", stats.avg_age)),
            Line::from(format!(
                "Average BP          {:.0}/{:.0} mmHg",
                stats.avg_systolic, stats.avg_diastolic
            )),
            Line::from(format!("Average cholesterol {:.0} mg/dL", stats.avg_cholesterol)),
            Line::from(format!(
                "Smokers             {} ({:.1}%)",
                stats.smokers_count, stats.smokers_percentage
            )),
            Line::from(format!(
                "Hypertension        {} ({:.1}%)",
                stats.hypertension_count, stats.hypertension_percentage
            )),
            Line::from(format!(
                "Diabetes            {} ({:.1}%)",
                stats.diabetes_count, stats.diabetes_percentage
            )),
        ]
    }
}

/// Display values of a submitted input, one per field.
fn input_rows(input: &RiskInput) -> Vec<(Field, String)> {
    let yes_no = |b: bool| if b { "Yes" } else { "No" }.to_string();
    let with_unit = |field: Field, value: String| match field.unit() {
        Some(unit) => format!("{value} {unit}"),
        None => value,
    };
    Field::ALL
        .iter()
        .map(|&field| {
            let value = match field {
                Field::Age => with_unit(field, input.age.to_string()),
                Field::Sex => match input.sex {
                    Sex::Male => "Male".to_string(),
                    Sex::Female => "Female".to_string(),
                },
                Field::Education => Field::Education.display_value(&input.education.level().to_string()),
                Field::IsSmoking => yes_no(input.is_smoking),
                Field::CigsPerDay => with_unit(field, input.cigs_per_day.to_string()),
                Field::BpMeds => yes_no(input.bp_meds),
                Field::PrevalentStroke => yes_no(input.prevalent_stroke),
                Field::PrevalentHyp => yes_no(input.prevalent_hyp),
                Field::Diabetes => yes_no(input.diabetes),
                Field::TotChol => with_unit(field, input.tot_chol.to_string()),
                Field::SysBp => with_unit(field, input.sys_bp.to_string()),
                Field::DiaBp => with_unit(field, input.dia_bp.to_string()),
                Field::Bmi => with_unit(field, input.bmi.to_string()),
                Field::HeartRate => with_unit(field, input.heart_rate.to_string()),
                Field::Glucose => input
                    .glucose
                    .map(|g| with_unit(field, g.to_string()))
                    .unwrap_or_else(|| "not given".to_string()),
            };
            (field, value)
        })
        .collect()
}

// --- FooterView ---
pub struct FooterView;

pub struct FooterProps<'a> {
    pub status: Option<&'a str>,
    pub editing: bool,
    pub active_tab: ActiveTab,
}

impl FooterView {
    pub fn render(frame: &mut Frame, area: Rect, props: &FooterProps) {
        let hints = if props.editing {
            "Enter: save  Esc: cancel"
        } else {
            match props.active_tab {
                ActiveTab::Form => "j/k: move  Enter: edit  ←/→: change  s: predict  r: reset  Tab: history  ?: help  q: quit",
                ActiveTab::History => "j/k: move  c: clear history  Tab: form  ?: help  q: quit",
            }
        };
        let lines = vec![
            Line::from(Span::styled(
                props.status.unwrap_or("").to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

// --- ConfirmView ---
pub struct ConfirmView;

impl ConfirmView {
    pub fn render(frame: &mut Frame, area: Rect, count: usize) {
        let popup = centered_rect(50, 5, area);
        frame.render_widget(Clear, popup);
        let text = vec![
            Line::from(format!("Delete all {count} prediction(s)?")),
            Line::from(Span::styled("y: yes   n: no", Style::default().fg(Color::DarkGray))),
        ];
        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Clear History ")
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(paragraph, popup);
    }
}

// --- HelpView ---
pub struct HelpView;

impl HelpView {
    pub fn render(frame: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 16, area);
        frame.render_widget(Clear, popup);
        let rows = [
            ("Tab", "switch between form and history"),
            ("j / k, Up / Down", "move selection"),
            ("Enter", "edit the selected field"),
            ("Left / Right, Space", "change a Yes/No or choice field"),
            ("s", "predict"),
            ("r", "reset the form"),
            ("c", "clear history (history tab)"),
            ("Esc", "cancel editing or close this help"),
            ("q, Ctrl-C", "quit"),
        ];
        let mut lines: Vec<Line> = rows
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(format!("{key:<22}"), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(*what),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Red: high risk value   Yellow: moderate",
            Style::default().fg(Color::DarkGray),
        )));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Help "))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chd_model::{validate, RiskForm};

    #[test]
    fn centered_rect_fits_very_wide_terminals() {
        let area = Rect::new(0, 0, 2000, 50);
        let popup = centered_rect(60, 12, area);
        assert_eq!(popup.width, 1200);
        assert_eq!(popup.x, 400);
        assert_eq!(popup.height, 12);
        assert_eq!(popup.y, 19);
    }

    #[test]
    fn timestamps_render_as_dates() {
        let text = format_timestamp(1_700_000_000);
        assert_eq!(text.len(), "2023-11-14 22:13".len());
        assert!(text.starts_with("2023-11-1"));
    }

    #[test]
    fn input_rows_cover_every_field() {
        let form = RiskForm::new()
            .with_value(Field::Age, "50")
            .with_value(Field::TotChol, "200")
            .with_value(Field::SysBp, "120")
            .with_value(Field::DiaBp, "80")
            .with_value(Field::Bmi, "24")
            .with_value(Field::HeartRate, "70");
        let input = validate(&form).unwrap();
        let rows = input_rows(&input);
        assert_eq!(rows.len(), Field::ALL.len());
        assert_eq!(rows[1], (Field::Sex, "Male".to_string()));
        assert_eq!(rows.last().unwrap().1, "not given");
    }
}
