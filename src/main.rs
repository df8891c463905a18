mod app;
mod ui;

rust_i18n::i18n!("locales", fallback = "en");

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};
use rust_i18n::t;

use hanquiz::config::Config;
use hanquiz::error::QuizError;
use hanquiz::generator::QuizType;
use hanquiz::store::json_store::JsonStore;
use hanquiz::store::{KeyValueStore, MemoryStore};
use hanquiz::vocabulary::Vocabulary;

use app::{App, AppScreen, SETTINGS_COUNT};
use ui::components::filter_panel::{FilterPanel, filter_rows, summary_text};
use ui::components::hangul_table::HangulTable;
use ui::components::progress_dashboard::ProgressDashboard;
use ui::components::quiz_view::{QuizView, quiz_type_label};
use ui::components::result_view::ResultView;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};

#[derive(Parser)]
#[command(name = "hanquiz", version, about = "Terminal Korean vocabulary quiz with progress tracking")]
struct Cli {
    #[arg(short = 'n', long, help = "Number of questions per quiz")]
    count: Option<usize>,

    #[arg(short, long, help = "Default quiz type (meaning, reading, pronunciation)")]
    quiz: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Vocabulary CSV file to use instead of the bundled list")]
    vocab: Option<PathBuf>,

    #[arg(long, help = "URL to fetch the vocabulary CSV from")]
    url: Option<String>,

    #[arg(short, long, help = "Progress profile name")]
    profile: Option<String>,

    #[arg(short, long, help = "Interface language (ja, en)")]
    locale: Option<String>,
}

fn init_logging() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("hanquiz")) else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    // The terminal belongs to the UI, so log lines go to a file.
    let Ok(file) = File::create(dir.join("hanquiz.log")) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn load_vocabulary(config: &Config) -> Result<Vocabulary, QuizError> {
    if let Some(path) = &config.vocabulary_path {
        return Vocabulary::from_path(path);
    }
    if let Some(url) = &config.vocabulary_url {
        match Vocabulary::fetch(url) {
            Ok(vocabulary) => return Ok(vocabulary),
            Err(e) => log::warn!("{e}; using the bundled vocabulary"),
        }
    }
    Vocabulary::bundled()
}

fn open_store() -> Box<dyn KeyValueStore> {
    match JsonStore::new() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("progress will not be saved: {e}");
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable config: {e}");
        Config::default()
    });
    if let Some(count) = cli.count {
        config.question_count = count;
    }
    if let Some(quiz) = cli.quiz {
        config.quiz_type = quiz;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(profile) = cli.profile {
        config.profile = profile;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if cli.vocab.is_some() {
        config.vocabulary_path = cli.vocab;
    }
    if cli.url.is_some() {
        config.vocabulary_url = cli.url;
    }
    config.validate();
    rust_i18n::set_locale(&config.locale);

    let vocabulary = load_vocabulary(&config).context("cannot load vocabulary")?;
    log::info!("loaded {} words", vocabulary.len());

    let mut app = App::new(config, vocabulary, open_store());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            handle_key(app, key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // An open notice swallows the key that closes it.
    if app.notice.is_some() {
        app.dismiss_notice();
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::QuizResult => handle_result_key(app, key),
        AppScreen::Progress => handle_progress_key(app, key),
        AppScreen::Filter => handle_filter_key(app, key),
        AppScreen::HangulTable => handle_hangul_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn activate_menu_item(app: &mut App, index: usize) {
    match index {
        0 => app.start_quiz(QuizType::Meaning),
        1 => app.start_quiz(QuizType::Reading),
        2 => app.start_quiz(QuizType::Pronunciation),
        3 => app.go_to_filter(),
        4 => app.go_to_progress(),
        5 => app.go_to_hangul_table(),
        6 => app.go_to_settings(),
        7 => app.should_quit = true,
        _ => {}
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_quiz(QuizType::Meaning),
        KeyCode::Char('2') => app.start_quiz(QuizType::Reading),
        KeyCode::Char('3') => app.start_quiz(QuizType::Pronunciation),
        KeyCode::Char('f') => app.go_to_filter(),
        KeyCode::Char('p') => app.go_to_progress(),
        KeyCode::Char('h') => app.go_to_hangul_table(),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let selected = app.menu.selected;
            activate_menu_item(app, selected);
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char(ch @ '1'..='4') => {
            let option = ch as usize - '1' as usize;
            app.answer(option);
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.next_question(),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry_quiz(),
        KeyCode::Char('p') => app.go_to_progress(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn progress_row_count(app: &App) -> usize {
    app.ledger.progress().map_or(0, |progress| {
        ProgressDashboard::new(progress, &app.history, &app.vocabulary, app.theme)
            .mistake_threshold(app.config.mistake_threshold)
            .row_count()
    })
}

fn handle_progress_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => {
            let rows = progress_row_count(app);
            app.scroll_progress(1, rows);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let rows = progress_row_count(app);
            app.scroll_progress(-1, rows);
        }
        KeyCode::PageDown => {
            let rows = progress_row_count(app);
            app.scroll_progress(10, rows);
        }
        KeyCode::PageUp => {
            let rows = progress_row_count(app);
            app.scroll_progress(-10, rows);
        }
        _ => {}
    }
}

fn handle_filter_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.filter_move(false),
        KeyCode::Down | KeyCode::Char('j') => app.filter_move(true),
        KeyCode::Char(' ') | KeyCode::Enter => app.filter_toggle(),
        KeyCode::Char('a') => app.filter_select_all(),
        KeyCode::Char('x') => app.filter_clear(),
        _ => {}
    }
}

fn handle_hangul_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
        app.go_to_menu();
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.save_settings();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if app.settings_selected > 0 {
                app.settings_selected -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_COUNT {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle_forward();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle_backward();
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let app_layout = AppLayout::new(area);
    render_header(frame, app, &app_layout);

    let hints: Vec<String> = match app.screen {
        AppScreen::Menu => render_menu(frame, app, &app_layout),
        AppScreen::Quiz => render_quiz(frame, app, &app_layout),
        AppScreen::QuizResult => render_result(frame, app, &app_layout),
        AppScreen::Progress => render_progress(frame, app, &app_layout),
        AppScreen::Filter => render_filter(frame, app, &app_layout),
        AppScreen::HangulTable => render_hangul(frame, app, &app_layout),
        AppScreen::Settings => render_settings(frame, app, &app_layout),
    };
    render_footer(frame, app, &app_layout, &hints);

    if let Some(notice) = &app.notice {
        render_notice(frame, app, notice);
    }
}

fn hint_list(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|key| hint_text(key)).collect()
}

fn hint_text(key: &str) -> String {
    let text = match key {
        "start" => t!("hint.start"),
        "answer" => t!("hint.answer"),
        "next" => t!("hint.next"),
        "menu" => t!("hint.menu"),
        "back" => t!("hint.back"),
        "move" => t!("hint.move"),
        "select" => t!("hint.select"),
        "toggle" => t!("hint.toggle"),
        "select_all" => t!("hint.select_all"),
        "clear" => t!("hint.clear"),
        "change" => t!("hint.change"),
        "save_back" => t!("hint.save_back"),
        "retry" => t!("hint.retry"),
        "progress" => t!("hint.progress"),
        "scroll" => t!("hint.scroll"),
        "quit" => t!("hint.quit"),
        "dismiss" => t!("hint.dismiss"),
        _ => return String::new(),
    };
    text.to_string()
}

fn render_header(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout) {
    let colors = &app.theme.colors;
    let categories = app.vocabulary.categories();
    let levels = app.vocabulary.levels();
    let summary = summary_text(app.filter.summary(categories.len(), levels.len()));
    let overall = app.ledger.overall_progress().unwrap_or(0);

    let header_info = format!(
        " {} | {}% | {}",
        t!("app.words_loaded", count = app.vocabulary.len()),
        overall,
        summary
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", t!("app.title")),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout, hints: &[String]) {
    let colors = &app.theme.colors;
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    let lines: Vec<Line> = pack_hint_lines(&hint_refs, app_layout.footer.width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), app_layout.footer);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout) -> Vec<String> {
    let menu_area = centered_rect(50, 90, app_layout.main);
    frame.render_widget(&app.menu, menu_area);
    hint_list(&["start", "move", "select", "quit"])
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout) -> Vec<String> {
    let Some(session) = &app.session else {
        return Vec::new();
    };
    let area = centered_rect(70, 90, app_layout.main);
    frame.render_widget(QuizView::new(session, app.theme), area);
    if session.pending_answer().is_some() {
        hint_list(&["next", "menu"])
    } else {
        hint_list(&["answer", "menu"])
    }
}

fn render_result(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout) -> Vec<String> {
    if let Some(result) = &app.last_result {
        let area = centered_rect(60, 70, app_layout.main);
        frame.render_widget(ResultView::new(result, app.theme), area);
    }
    hint_list(&["retry", "progress", "menu"])
}

fn render_progress(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout) -> Vec<String> {
    if let Some(progress) = app.ledger.progress() {
        let dashboard = ProgressDashboard::new(progress, &app.history, &app.vocabulary, app.theme)
            .mistake_threshold(app.config.mistake_threshold)
            .scroll(app.progress_scroll);
        frame.render_widget(dashboard, app_layout.main);
    }
    hint_list(&["scroll", "back"])
}

fn render_filter(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout) -> Vec<String> {
    let categories = app.vocabulary.categories();
    let levels = app.vocabulary.levels();
    let rows = filter_rows(&categories, &levels, !app.mistaken_words().is_empty());
    let summary = summary_text(app.filter.summary(categories.len(), levels.len()));

    let area = centered_rect(60, 95, app_layout.main);
    let panel = FilterPanel::new(
        &app.filter,
        &rows,
        app.filter_selected,
        summary,
        app.pool_size(),
        app.theme,
    );
    frame.render_widget(panel, area);
    hint_list(&["move", "toggle", "select_all", "clear", "back"])
}

fn render_hangul(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout) -> Vec<String> {
    frame.render_widget(HangulTable::new(app.theme), app_layout.main);
    hint_list(&["back"])
}

fn locale_label(locale: &str) -> &str {
    match locale {
        "ja" => "日本語",
        "en" => "English",
        other => other,
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App, app_layout: &AppLayout) -> Vec<String> {
    let colors = &app.theme.colors;
    let centered = centered_rect(60, 80, app_layout.main);

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields: Vec<(String, String)> = vec![
        (
            t!("settings.question_count").to_string(),
            app.config.question_count.to_string(),
        ),
        (
            t!("settings.quiz_type").to_string(),
            quiz_type_label(app.config.default_quiz_type()),
        ),
        (t!("settings.theme").to_string(), app.config.theme.clone()),
        (
            t!("settings.locale").to_string(),
            locale_label(&app.config.locale).to_string(),
        ),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
        ])
        .split(inner);

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let value_style = Style::default().fg(if is_selected {
            colors.highlight()
        } else {
            colors.muted()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("    < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    hint_list(&["move", "change", "save_back"])
}

fn render_notice(frame: &mut ratatui::Frame, app: &App, notice: &str) {
    let colors = &app.theme.colors;
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(format!(" {} ", t!("notice.title")))
        .border_style(Style::default().fg(colors.warning()))
        .style(Style::default().bg(colors.bg()));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(notice.to_string(), Style::default().fg(colors.fg()))),
        Line::from(""),
        Line::from(Span::styled(
            t!("hint.dismiss").to_string(),
            Style::default().fg(colors.muted()),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
