use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use hanquiz::config::{Config, LOCALES, MAX_QUESTION_COUNT};
use hanquiz::engine::{Ledger, StudyFilter, filter_vocabulary};
use hanquiz::error::QuizError;
use hanquiz::generator::{QuizType, generate_quiz};
use hanquiz::session::{LedgerEffect, Phase, QuizResult, QuizSession};
use hanquiz::store::schema::HistoryData;
use hanquiz::store::{KeyValueStore, load_history, progress_key, save_history};
use hanquiz::vocabulary::Vocabulary;

use crate::ui::components::filter_panel::{FilterRow, FilterSection, filter_rows};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

pub const SETTINGS_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Quiz,
    QuizResult,
    Progress,
    Filter,
    HangulTable,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Option<QuizSession>,
    pub last_quiz_type: QuizType,
    pub last_result: Option<QuizResult>,
    pub history: HistoryData,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub vocabulary: Vocabulary,
    pub ledger: Ledger<Box<dyn KeyValueStore>>,
    pub filter: StudyFilter,
    pub filter_selected: usize,
    pub settings_selected: usize,
    pub progress_scroll: usize,
    /// Blocking message; the next key press dismisses it.
    pub notice: Option<String>,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, vocabulary: Vocabulary, store: Box<dyn KeyValueStore>) -> Self {
        Self::with_rng(config, vocabulary, store, SmallRng::from_entropy())
    }

    pub fn with_rng(
        config: Config,
        vocabulary: Vocabulary,
        store: Box<dyn KeyValueStore>,
        rng: SmallRng,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let history = load_history(store.as_ref(), &config.profile);
        let mut ledger = Ledger::new(store, progress_key(&config.profile));
        ledger.load_or_initialize(vocabulary.words());

        Self {
            screen: AppScreen::Menu,
            session: None,
            last_quiz_type: config.default_quiz_type(),
            last_result: None,
            history,
            menu,
            theme,
            config,
            vocabulary,
            ledger,
            filter: StudyFilter::default(),
            filter_selected: 0,
            settings_selected: 0,
            progress_scroll: 0,
            notice: None,
            should_quit: false,
            rng,
        }
    }

    /// Keys of words missed at least `mistake_threshold` times.
    pub fn mistaken_words(&self) -> HashSet<String> {
        self.ledger
            .frequently_mistaken(self.config.mistake_threshold)
            .unwrap_or_default()
            .into_iter()
            .collect()
    }

    pub fn pool_size(&self) -> usize {
        let mistaken = self.mistaken_words();
        filter_vocabulary(self.vocabulary.words(), &self.filter, &mistaken).len()
    }

    pub fn start_quiz(&mut self, quiz_type: QuizType) {
        self.last_quiz_type = quiz_type;
        self.drop_stale_mistakes_filter();
        let mistaken = self.mistaken_words();
        let pool = filter_vocabulary(self.vocabulary.words(), &self.filter, &mistaken);
        match generate_quiz(
            &pool,
            quiz_type,
            self.config.question_count,
            self.ledger.progress(),
            &mut self.rng,
        ) {
            Ok(questions) => {
                log::debug!(
                    "starting {} quiz with {} questions from {} words",
                    quiz_type.as_str(),
                    questions.len(),
                    pool.len()
                );
                self.session = Some(QuizSession::new(quiz_type, questions));
                self.screen = AppScreen::Quiz;
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn show_error(&mut self, err: &QuizError) {
        if !err.is_user_facing() {
            log::error!("{err}");
        }
        let message = match err {
            QuizError::InsufficientVocabulary {
                available,
                required,
            } => t!(
                "notice.insufficient",
                available = available,
                required = required
            )
            .to_string(),
            other => t!("notice.error", message = other.to_string()).to_string(),
        };
        self.notice = Some(message);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn answer(&mut self, option: usize) {
        let Some(effect) = self
            .session
            .as_mut()
            .and_then(|s| s.answer(option))
            .map(|a| a.effect.clone())
        else {
            return;
        };
        let applied = match &effect {
            LedgerEffect::Learned(word) => self.ledger.record_learned(word).map(|_| ()),
            LedgerEffect::Mistake(word) => self.ledger.record_mistake(word).map(|_| ()),
            LedgerEffect::ResetMistakes(word) => self.ledger.reset_mistake_count(word).map(|_| ()),
            LedgerEffect::None => Ok(()),
        };
        if let Err(e) = applied {
            log::warn!("progress not updated: {e}");
        }
    }

    /// Move to the next question once the current one is answered.
    pub fn next_question(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.pending_answer().is_none() {
            return;
        }
        if session.advance() == Phase::Complete {
            self.finish_quiz();
        }
    }

    fn finish_quiz(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let result = QuizResult::from_session(&session);
        log::info!(
            "{} quiz finished: {}/{} (review {}/{})",
            result.quiz_type.as_str(),
            result.correct,
            result.total,
            result.review_correct,
            result.review_total
        );
        self.history.push(result.clone());
        if let Err(e) = save_history(self.ledger.store(), &self.config.profile, &self.history) {
            log::warn!("cannot save session history: {e}");
        }
        self.last_result = Some(result);
        self.screen = AppScreen::QuizResult;
    }

    pub fn retry_quiz(&mut self) {
        self.start_quiz(self.last_quiz_type);
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
        self.session = None;
    }

    pub fn go_to_progress(&mut self) {
        self.progress_scroll = 0;
        self.screen = AppScreen::Progress;
    }

    pub fn scroll_progress(&mut self, delta: isize, max: usize) {
        self.progress_scroll = self
            .progress_scroll
            .saturating_add_signed(delta)
            .min(max.saturating_sub(1));
    }

    pub fn go_to_hangul_table(&mut self) {
        self.screen = AppScreen::HangulTable;
    }

    pub fn go_to_filter(&mut self) {
        self.drop_stale_mistakes_filter();
        self.filter_selected = 0;
        self.screen = AppScreen::Filter;
    }

    /// Returns whether any word currently counts as frequently mistaken.
    /// A mistakes-only flag left over from before the last reset would
    /// otherwise empty the pool, so it is cleared.
    fn drop_stale_mistakes_filter(&mut self) -> bool {
        let mistakes_available = !self.mistaken_words().is_empty();
        if !mistakes_available {
            self.filter.show_mistakes_only = false;
        }
        mistakes_available
    }

    pub fn filter_rows(&mut self) -> Vec<FilterRow> {
        let mistakes_available = self.drop_stale_mistakes_filter();
        filter_rows(
            &self.vocabulary.categories(),
            &self.vocabulary.levels(),
            mistakes_available,
        )
    }

    pub fn filter_move(&mut self, down: bool) {
        let len = self.filter_rows().len();
        if len == 0 {
            return;
        }
        self.filter_selected = if down {
            (self.filter_selected + 1).min(len - 1)
        } else {
            self.filter_selected.saturating_sub(1)
        };
    }

    pub fn filter_toggle(&mut self) {
        let rows = self.filter_rows();
        match rows.get(self.filter_selected) {
            Some(FilterRow::MistakesOnly) => {
                self.filter.show_mistakes_only = !self.filter.show_mistakes_only;
            }
            Some(FilterRow::Category(c)) => self.filter.toggle_category(c),
            Some(FilterRow::Level(l)) => self.filter.toggle_level(l),
            None => {}
        }
    }

    fn selected_filter_section(&mut self) -> Option<FilterSection> {
        self.filter_rows()
            .get(self.filter_selected)
            .map(FilterRow::section)
    }

    pub fn filter_select_all(&mut self) {
        match self.selected_filter_section() {
            Some(FilterSection::Categories) => {
                self.filter
                    .select_all_categories(&self.vocabulary.categories());
            }
            Some(FilterSection::Levels) => {
                self.filter.select_all_levels(&self.vocabulary.levels());
            }
            Some(FilterSection::Mistakes) => self.filter.show_mistakes_only = true,
            None => {}
        }
    }

    pub fn filter_clear(&mut self) {
        match self.selected_filter_section() {
            Some(FilterSection::Categories) => self.filter.clear_categories(),
            Some(FilterSection::Levels) => self.filter.clear_levels(),
            Some(FilterSection::Mistakes) => self.filter.show_mistakes_only = false,
            None => {}
        }
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn save_settings(&self) {
        if let Err(e) = self.config.save() {
            log::warn!("cannot save config: {e}");
        }
    }

    fn set_theme(&mut self, name: String) {
        self.config.theme = name;
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
    }

    fn set_locale(&mut self, locale: &str) {
        self.config.locale = locale.to_string();
        rust_i18n::set_locale(locale);
        self.menu.relabel();
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_cycle(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_cycle(false);
    }

    fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                let count = self.config.question_count;
                self.config.question_count = if forward {
                    (count + 1).min(MAX_QUESTION_COUNT)
                } else {
                    count.saturating_sub(1).max(1)
                };
            }
            1 => {
                let types = QuizType::all();
                let current = self.config.default_quiz_type();
                let idx = types.iter().position(|t| *t == current).unwrap_or(0);
                let next = cycle_index(idx, types.len(), forward);
                self.config.quiz_type = types[next].as_str().to_string();
                self.last_quiz_type = types[next];
            }
            2 => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return;
                }
                let next = match themes.iter().position(|t| *t == self.config.theme) {
                    Some(idx) => cycle_index(idx, themes.len(), forward),
                    None => 0,
                };
                self.set_theme(themes[next].clone());
            }
            3 => {
                let idx = LOCALES
                    .iter()
                    .position(|l| *l == self.config.locale)
                    .unwrap_or(0);
                let next = cycle_index(idx, LOCALES.len(), forward);
                self.set_locale(LOCALES[next]);
            }
            _ => {}
        }
    }
}

fn cycle_index(idx: usize, len: usize, forward: bool) -> usize {
    if forward {
        (idx + 1) % len
    } else if idx == 0 {
        len - 1
    } else {
        idx - 1
    }
}
