// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::error::Error;
use std::fs::{self, File};
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use wordwiz::catalog::{BuiltinProvider, FileProvider, WordProvider};
use wordwiz::config::{QuizOptions, configure};
use wordwiz::sink::JsonFileSink;
use wordwiz::stats::{self, SessionStats};
use wordwiz::store::{FileStore, KeyValueStore};
use wordwiz::{AnswerOutcome, Mode, Question, Quiz, Step, Summary};

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

// --------------------------------------------------
// コマンドライン引数
// --------------------------------------------------

/// 数字キー 1〜9 で選べる選択肢の数
const MAX_KEY_CHOICES: usize = 9;

#[derive(Parser, Debug)]
#[command(name = "wordwiz", about = "WORD WiZ. 単語の4択クイズ", version)]
struct Cli {
    /// 単語リスト (.json またはタブ区切りテキスト)
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// 設定ファイル (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 0: 意味を答える, 1: 単語を答える
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=1))]
    mode: Option<u8>,

    /// 選択肢の数
    #[arg(long)]
    choices: Option<usize>,

    /// 問題数
    #[arg(short = 'n', long)]
    questions: Option<usize>,

    /// 正解に似た誤答も出す
    #[arg(long)]
    allow_similar: bool,

    /// 回答結果の書き出し先 (JSON)
    #[arg(long)]
    results_out: Option<PathBuf>,

    /// 乱数のシード
    #[arg(long)]
    seed: Option<u64>,

    /// 成績を保存しない
    #[arg(long)]
    no_save: bool,

    /// 成績を表示して終了
    #[arg(long)]
    stats: bool,

    /// 成績を消去して終了
    #[arg(long)]
    reset_stats: bool,
}

impl Cli {
    /// 設定ファイルを読み、引数で上書きする
    fn quiz_options(&self) -> Result<QuizOptions, Box<dyn Error>> {
        let mut options = match &self.config {
            Some(path) => QuizOptions::from_json_file(path)?,
            None => QuizOptions::default(),
        };

        if let Some(path) = &self.words {
            let provider = FileProvider::new(path);
            match provider.provide() {
                Ok(source) => options.words = Some(source),
                // 設定ファイル側の単語リストはそのまま残す
                Err(e) => {
                    warn!("単語リストの読み込みに失敗しました: {e}");
                    eprintln!(
                        "警告: {} を読み込めませんでした: {e}",
                        provider.path().display()
                    );
                }
            }
        }
        if options.fallback_words.is_none() {
            options.fallback_words = BuiltinProvider.provide().ok();
        }
        if let Some(mode) = self.mode {
            options.mode = Mode::try_from(mode)?;
        }
        if let Some(choices) = self.choices {
            options.selection_count = choices;
        }
        if let Some(questions) = self.questions {
            options.question_count = questions;
        }
        if self.allow_similar {
            options.avoid_similar_distractors = false;
        }
        if options.selection_count > MAX_KEY_CHOICES {
            warn!(
                "選択肢は {MAX_KEY_CHOICES} 個までです ({} → {MAX_KEY_CHOICES})",
                options.selection_count
            );
            options.selection_count = MAX_KEY_CHOICES;
        }
        Ok(options)
    }
}

// --------------------------------------------------
// 画面の状態
// --------------------------------------------------

enum Screen {
    Question {
        question: Question,
        hint: Option<String>,
    },
    Answered {
        question: Question,
        outcome: AnswerOutcome,
    },
    Finished {
        summary: Summary,
        stats: Option<SessionStats>,
    },
    NoData,
}

/// アプリ全体の状態を管理する
struct AppState {
    quiz: Quiz,
    screen: Screen,
}

impl AppState {
    fn new(quiz: Quiz) -> Self {
        let mut state = Self {
            quiz,
            screen: Screen::NoData,
        };
        state.advance(); // 最初の問題を読み込む
        state
    }

    /// 次の問題 (または結果画面) へ
    fn advance(&mut self) {
        self.screen = match self.quiz.generate_next_question() {
            Step::Question(question) => Screen::Question {
                question,
                hint: None,
            },
            Step::Finished(summary) => Screen::Finished {
                summary,
                stats: self.quiz.stats(),
            },
            Step::NoData => Screen::NoData,
        };
    }

    /// 選択肢を選ぶ (0始まり)
    fn choose(&mut self, choice: usize) {
        let Screen::Question { question, .. } = &self.screen else {
            return;
        };
        let question = question.clone();
        match self.quiz.record_answer(choice) {
            Ok(outcome) => self.screen = Screen::Answered { question, outcome },
            Err(e) => debug!("回答を受け付けませんでした: {e}"),
        }
    }

    fn show_hint(&mut self) {
        let text = match self.quiz.use_hint() {
            Some(hint) => hint.to_string(),
            None => self.quiz.text("noHint").to_string(),
        };
        if let Screen::Question { hint, .. } = &mut self.screen {
            *hint = Some(text);
        }
    }

    fn restart(&mut self) {
        self.quiz.restart();
        self.advance();
    }

    /// キー入力の処理。終了するなら false
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let on_question = matches!(self.screen, Screen::Question { .. });
        let on_answered = matches!(self.screen, Screen::Answered { .. });
        let on_finished = matches!(self.screen, Screen::Finished { .. });

        match code {
            KeyCode::Esc | KeyCode::Char('q') => return false,
            KeyCode::Char('h') if on_question => self.show_hint(),
            KeyCode::Char(c) if on_question => {
                if let Some(digit) = c.to_digit(10).filter(|d| *d >= 1) {
                    self.choose(digit as usize - 1);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') if on_answered => self.advance(),
            KeyCode::Char('r') if on_finished => self.restart(),
            _ => {}
        }
        true
    }
}

// --------------------------------------------------
// メイン関数 (TUIセットアップと実行ループ)
// --------------------------------------------------

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    let mut store: Option<Box<dyn KeyValueStore>> = if cli.no_save {
        None
    } else {
        match FileStore::open_default() {
            Ok(store) => Some(Box::new(store)),
            Err(e) => {
                warn!("成績の保存先を開けませんでした: {e}");
                None
            }
        }
    };

    if cli.reset_stats {
        if let Some(store) = store.as_mut() {
            stats::reset(store.as_mut());
        }
        println!("成績を消去しました");
        return Ok(());
    }
    if cli.stats {
        let stats = store
            .as_deref()
            .map(|store| stats::load(store))
            .unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let config = configure(cli.quiz_options()?);
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut quiz = Quiz::with_rng(config, rng);
    if let Some(store) = store {
        quiz = quiz.with_store(store);
    }
    if let Some(path) = &cli.results_out {
        quiz = quiz.with_sink(Box::new(JsonFileSink::new(path)));
    }

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, AppState::new(quiz));
    restore_terminal(&mut terminal)?;
    result?;
    Ok(())
}

/// ログはデータディレクトリのファイルへ (画面を崩さないため)
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(dir) = FileStore::data_dir() {
        if fs::create_dir_all(&dir).is_ok() {
            if let Ok(file) = File::create(dir.join("wordwiz.log")) {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }
    }
    let _ = builder.try_init();
}

fn setup_terminal() -> std::io::Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal(_terminal: &mut Terminal<impl Backend>) -> std::io::Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<impl Backend>, mut app_state: AppState) -> std::io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, &app_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press && !app_state.handle_key(key.code) {
                    break;
                }
            }
        }
    }

    Ok(())
}

// --------------------------------------------------
// UI描画
// --------------------------------------------------

fn ui(f: &mut Frame, app_state: &AppState) {
    let quiz = &app_state.quiz;
    let size = f.area();
    // 枠線を描画
    let block = Block::default()
        .borders(Borders::ALL)
        .title(quiz.text("title").to_string());
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] 進行状況 (問題番号, スコア)
            Constraint::Length(1), // [1] 空白
            Constraint::Length(1), // [2] 問題文
            Constraint::Length(2), // [3] ヒント / 正誤
            Constraint::Min(1),    // [4] 選択肢 / 結果
            Constraint::Length(1), // [5] 操作説明
        ])
        .split(inner_area);

    // 0. 進行状況ゲージ
    let question_count = quiz.config().question_count;
    let summary = quiz.session_summary();
    let ratio = (summary.total as f64 / question_count as f64).min(1.0);
    let label = format!(
        "{} {} / {}   {} {}",
        quiz.text("question"),
        quiz.question_number().min(question_count),
        question_count,
        quiz.text("score"),
        summary.correct_count
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::NONE))
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .ratio(ratio)
        .label(label);
    f.render_widget(gauge, chunks[0]);

    match &app_state.screen {
        Screen::Question { question, hint } => {
            render_prompt(f, chunks[2], question);
            if let Some(hint) = hint {
                f.render_widget(
                    Paragraph::new(format!("{}: {hint}", quiz.text("hint")))
                        .style(Style::default().fg(Color::Yellow))
                        .centered(),
                    chunks[3],
                );
            }
            render_choices(f, chunks[4], question, None);
            render_keys(f, chunks[5], quiz.text("keysQuestion"));
        }
        Screen::Answered { question, outcome } => {
            render_prompt(f, chunks[2], question);
            let verdict = if outcome.record.correct {
                Line::from(quiz.text("correct").to_string()).style(Style::default().fg(Color::Green).bold())
            } else {
                Line::from(format!(
                    "{}  {} 「{}」",
                    quiz.text("incorrect"),
                    quiz.text("answer"),
                    outcome.record.correct_answer
                ))
                .style(Style::default().fg(Color::Red).bold())
            };
            f.render_widget(Paragraph::new(verdict).centered(), chunks[3]);
            render_choices(f, chunks[4], question, Some(outcome));
            render_keys(f, chunks[5], quiz.text("keysAnswered"));
        }
        Screen::Finished { summary, stats } => {
            f.render_widget(
                Paragraph::new(quiz.text("finished").to_string())
                    .style(Style::default().fg(Color::White).bold())
                    .centered(),
                chunks[2],
            );
            render_summary(f, chunks[4], app_state, summary, stats.as_ref());
            render_keys(f, chunks[5], quiz.text("keysFinished"));
        }
        Screen::NoData => {
            f.render_widget(
                Paragraph::new(quiz.text("noData").to_string())
                    .style(Style::default().fg(Color::Red))
                    .centered(),
                chunks[2],
            );
        }
    }
}

fn render_prompt(f: &mut Frame, area: Rect, question: &Question) {
    f.render_widget(
        Paragraph::new(question.prompt.clone())
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        area,
    );
}

/// 選択肢 (回答後は正解を緑、選んだ誤答を赤で表示)
fn render_choices(f: &mut Frame, area: Rect, question: &Question, outcome: Option<&AnswerOutcome>) {
    let lines: Vec<Line> = question
        .choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let style = match outcome {
                Some(outcome) if i == outcome.correct_index => Style::default().fg(Color::Green),
                Some(outcome) if *choice == outcome.record.answer => Style::default().fg(Color::Red),
                Some(_) => Style::default().fg(Color::DarkGray),
                None => Style::default().fg(Color::Gray),
            };
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::Cyan)),
                Span::styled(choice.clone(), style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn render_summary(
    f: &mut Frame,
    area: Rect,
    app_state: &AppState,
    summary: &Summary,
    stats: Option<&SessionStats>,
) {
    let quiz = &app_state.quiz;
    let mut lines = vec![Line::from(format!(
        "{}: {} / {} ({:.0}%)",
        quiz.text("score"),
        summary.correct_count,
        summary.total,
        summary.percentage()
    ))
    .style(Style::default().fg(Color::Yellow))];

    if let Some(stats) = stats {
        lines.push(Line::from(format!(
            "{}: {}",
            quiz.text("highScore"),
            stats.high_score
        )));
        let weakest = stats.weakest_words(5);
        if !weakest.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(quiz.text("weakWords").to_string()).bold());
            for (word, word_stats) in weakest {
                lines.push(Line::from(format!(
                    "  {word}  {} / {}",
                    word_stats.correct, word_stats.attempts
                )));
            }
        }
    }

    // 今回間違えた問題
    for record in quiz.results().iter().filter(|r| !r.correct) {
        lines.push(
            Line::from(format!(
                "  ✗ {} → {} ({})",
                record.question, record.correct_answer, record.answer
            ))
            .style(Style::default().fg(Color::Red)),
        );
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_keys(f: &mut Frame, area: Rect, keys: &str) {
    f.render_widget(
        Paragraph::new(keys.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        area,
    );
}
