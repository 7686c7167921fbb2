use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hcris_dashboard::dashboard::overview::footer;
use hcris_dashboard::{
    render_view, write_export, Basis, DashboardConfig, PanelBody, Priority, SampleData,
    TextRenderer, View, ViewOptions, ViewReport, YEARS,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

pub struct App {
    pub data: Arc<SampleData>,
    pub view: View,
    pub year: u16,
    pub report: ViewReport,
    pub scroll: u16,
    pub export_dir: PathBuf,
    pub status: Option<String>,
}

impl App {
    pub fn new(data: Arc<SampleData>, config: &DashboardConfig) -> Self {
        let report = render_view(config.view, &data, &config.view_options());
        Self {
            data,
            view: config.view,
            year: config.year,
            report,
            scroll: 0,
            export_dir: config.export_dir.clone(),
            status: None,
        }
    }

    /// Re-render the selected view; every interaction ends here
    fn refresh(&mut self) {
        self.report = render_view(self.view, &self.data, &ViewOptions::for_year(self.year));
        self.scroll = 0;
    }

    pub fn select_view(&mut self, view: View) {
        self.view = view;
        self.refresh();
    }

    pub fn next_view(&mut self) {
        self.select_view(self.view.next());
    }

    pub fn previous_view(&mut self) {
        self.select_view(self.view.previous());
    }

    /// '1'..'6' jump straight to a view
    pub fn select_index(&mut self, index: usize) {
        if let Some(view) = View::ALL.get(index) {
            self.select_view(*view);
        }
    }

    pub fn next_year(&mut self) {
        self.step_year(1);
    }

    pub fn previous_year(&mut self) {
        self.step_year(-1);
    }

    // Stays inside the covered years; a year outside them snaps to the
    // nearest end
    fn step_year(&mut self, delta: isize) {
        let last = YEARS.len() as isize - 1;
        let current = match YEARS.iter().position(|y| *y == self.year) {
            Some(i) => i as isize,
            None if self.year < YEARS[0] => -1,
            None => last + 1,
        };
        let next = (current + delta).clamp(0, last) as usize;
        if YEARS[next] != self.year {
            self.year = YEARS[next];
            self.refresh();
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn export(&mut self) {
        self.status = Some(match write_export(&self.data, &self.export_dir) {
            Ok(path) => format!("Exported {}", path.display()),
            Err(err) => {
                warn!(error = %err, "export failed");
                format!("Export failed: {:#}", err)
            }
        });
    }

    /// Report as styled lines for the content area
    pub fn content_lines(&self) -> Vec<Line<'static>> {
        let renderer = TextRenderer::new();
        let mut lines = vec![Line::from(Span::styled(
            format!("  {}", self.view.summary()),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))];

        for panel in &self.report.panels {
            lines.push(Line::from(""));

            let mut title = vec![Span::styled(
                format!("  {}", panel.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )];
            if panel.basis == Basis::Illustrative {
                title.push(Span::styled(" (illustrative)", Style::default().fg(Color::DarkGray)));
            }
            lines.push(Line::from(title));

            match &panel.body {
                PanelBody::Placeholder(reason) => lines.push(Line::from(Span::styled(
                    format!("  ⚠ unavailable: {}", reason),
                    Style::default().fg(Color::Red),
                ))),
                PanelBody::Notes(notes) => {
                    for note in notes {
                        lines.push(Line::from(vec![
                            Span::styled(
                                format!("  [{}] ", note.priority.as_str()),
                                Style::default().fg(priority_color(note.priority)),
                            ),
                            Span::raw(note.headline.clone()),
                        ]));
                        lines.push(Line::from(Span::styled(
                            format!("      {}", note.detail),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
                body => {
                    for text in renderer.body_text(body).lines() {
                        lines.push(Line::from(text.to_string()));
                    }
                }
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", footer()),
            Style::default().fg(Color::DarkGray),
        )));
        lines
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Critical => Color::Red,
        Priority::High => Color::Yellow,
        Priority::Medium => Color::Cyan,
        Priority::Low => Color::Green,
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_view();
                    } else {
                        app.next_view();
                    }
                }
                KeyCode::BackTab => app.previous_view(),
                KeyCode::Char(c @ '1'..='6') => app.select_index(c as usize - '1' as usize),
                KeyCode::Right => app.next_year(),
                KeyCode::Left => app.previous_year(),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_down(1),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
                KeyCode::PageDown => app.scroll_down(20),
                KeyCode::PageUp => app.scroll_up(20),
                KeyCode::Home => app.scroll = 0,
                KeyCode::Char('e') => app.export(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with view tabs
            Constraint::Min(0),    // Panels
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_content(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, view) in View::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *view == app.view {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} {}", i + 1, view.label()), style));
    }

    if app.view == View::ContractLabor {
        tab_spans.push(Span::raw("  |  "));
        tab_spans.push(Span::styled(
            format!("Year: {}", app.year),
            Style::default().fg(Color::Green),
        ));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" 🏥 HCRIS Hospital Analytics "),
    );

    f.render_widget(header, area);
}

fn render_content(f: &mut Frame, area: Rect, app: &App) {
    let paragraph = Paragraph::new(app.content_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", app.report.title)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![Span::styled(
        format!(" Panels: {} ", app.report.panels.len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(status) = &app.status {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" View | "));
    status_spans.push(Span::styled("1-6", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Jump | "));
    status_spans.push(Span::styled("←/→", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Year | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Scroll | "));
    status_spans.push(Span::styled("e", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Export | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
