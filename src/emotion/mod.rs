//! Periodic emotion self-report.
//!
//! Every `interval` the user is asked which of four states best describes
//! them right now. A choice is appended to
//! `{data_dir}/{username}_emotion_performance.csv`; dismissing the prompt
//! records nothing.
//!
//! The interval timer runs on a worker thread and delivers ticks over a
//! one-slot channel, so ticks that arrive while a prompt is still open are
//! coalesced instead of queued. The thread checks the stop flag at least
//! once per second.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use colored::Colorize;

use crate::notify::Locale;
use crate::utils::csv::field as csv_field;

const CSV_HEADER: &str = "timestamp,emotion,description";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const POLL_STEP: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Emotion scale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Focused,
    Bored,
    Frustrated,
    Confused,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Focused,
        Emotion::Bored,
        Emotion::Frustrated,
        Emotion::Confused,
    ];

    pub fn letter(self) -> char {
        match self {
            Self::Focused => 'A',
            Self::Bored => 'B',
            Self::Frustrated => 'C',
            Self::Confused => 'D',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.letter() == letter.to_ascii_uppercase())
    }

    pub fn name(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Self::Focused) => "Focused",
            (Locale::En, Self::Bored) => "Bored",
            (Locale::En, Self::Frustrated) => "Frustrated",
            (Locale::En, Self::Confused) => "Confused",
            (Locale::Zh, Self::Focused) => "专注",
            (Locale::Zh, Self::Bored) => "无聊",
            (Locale::Zh, Self::Frustrated) => "沮丧",
            (Locale::Zh, Self::Confused) => "困惑",
        }
    }

    pub fn description(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Self::Focused) => "coding flows, fully engaged",
            (Locale::En, Self::Bored) => "simple repetition, no challenge",
            (Locale::En, Self::Frustrated) => "repeated errors, hard to fix",
            (Locale::En, Self::Confused) => "stuck, no sense of direction",
            (Locale::Zh, Self::Focused) => "流畅编码，完全投入",
            (Locale::Zh, Self::Bored) => "简单重复，缺乏挑战",
            (Locale::Zh, Self::Frustrated) => "反复报错，难以解决",
            (Locale::Zh, Self::Confused) => "思路卡壳，不知方向",
        }
    }

    /// The `description` column written to the CSV, e.g. `A.专注（流畅编码，完全投入）`.
    pub fn record_text(self, locale: Locale) -> String {
        match locale {
            Locale::Zh => format!(
                "{}.{}（{}）",
                self.letter(),
                self.name(locale),
                self.description(locale)
            ),
            Locale::En => format!(
                "{}.{} ({})",
                self.letter(),
                self.name(locale),
                self.description(locale)
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EmotionLog {
    path: PathBuf,
}

impl EmotionLog {
    /// Open (creating if needed) the log for `username` under `data_dir`.
    pub fn open(data_dir: &Path, username: &str) -> Result<Self> {
        let path = data_dir.join(format!("{username}_emotion_performance.csv"));
        if !path.exists() {
            fs::create_dir_all(data_dir)
                .with_context(|| format!("failed to create {}", data_dir.display()))?;
            fs::write(&path, format!("{CSV_HEADER}\n"))
                .with_context(|| format!("failed to create {}", path.display()))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, emotion: Emotion, locale: Locale, at: NaiveDateTime) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(
            file,
            "{},{},{}",
            at.format(TIMESTAMP_FORMAT),
            csv_field(emotion.name(locale)),
            csv_field(&emotion.record_text(locale)),
        )
        .context("failed to append emotion response")
    }

    pub fn save_now(&self, emotion: Emotion, locale: Locale) -> Result<()> {
        self.save(emotion, locale, Local::now().naive_local())
    }
}

// ---------------------------------------------------------------------------
// Prompting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Chose(Emotion),
    /// Closed without choosing.
    Dismissed,
    /// Stop prompting altogether.
    Quit,
}

pub trait EmotionPrompt {
    fn ask(&mut self, username: &str, locale: Locale) -> Result<PromptAnswer>;
}

/// Line-oriented prompt: `A`-`D` chooses, empty dismisses, `q` or EOF quits.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> EmotionPrompt for TerminalPrompt<R, W> {
    fn ask(&mut self, username: &str, locale: Locale) -> Result<PromptAnswer> {
        let (title, question) = match locale {
            Locale::En => ("Coding emotion check", "Which best describes you right now?"),
            Locale::Zh => ("编程情绪微量表", "问题：当前最符合你状态的描述是？"),
        };

        writeln!(self.output)?;
        writeln!(self.output, "{} - {}", title.bold().cyan(), username)?;
        writeln!(self.output, "{question}")?;
        for emotion in Emotion::ALL {
            writeln!(
                self.output,
                "  {}. {} {}",
                emotion.letter(),
                emotion.name(locale),
                format!("({})", emotion.description(locale)).dimmed()
            )?;
        }
        write!(self.output, "[A-D, Enter to skip, q to quit] > ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(PromptAnswer::Quit);
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Ok(PromptAnswer::Quit);
        }
        let mut chars = answer.chars();
        Ok(match (chars.next(), chars.next()) {
            (Some(letter), None) => Emotion::from_letter(letter)
                .map(PromptAnswer::Chose)
                .unwrap_or(PromptAnswer::Dismissed),
            _ => PromptAnswer::Dismissed,
        })
    }
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Stops a running [`EmotionMonitor`] from another thread.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct EmotionMonitor {
    username: String,
    interval: Duration,
    locale: Locale,
    log: EmotionLog,
    running: Arc<AtomicBool>,
}

impl EmotionMonitor {
    pub fn new(username: &str, interval: Duration, locale: Locale, log: EmotionLog) -> Self {
        Self {
            username: username.to_string(),
            interval,
            locale,
            log,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn log(&self) -> &EmotionLog {
        &self.log
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.running))
    }

    /// Prompt once and record the answer. Returns the answer given.
    pub fn prompt_once<P: EmotionPrompt>(&self, prompt: &mut P) -> Result<PromptAnswer> {
        let answer = prompt.ask(&self.username, self.locale)?;
        if let PromptAnswer::Chose(emotion) = answer {
            self.log.save_now(emotion, self.locale)?;
        }
        Ok(answer)
    }

    /// Prompt immediately and then every interval until the prompt answers
    /// [`PromptAnswer::Quit`] or the monitor is stopped. Returns the number
    /// of responses saved.
    pub fn run<P: EmotionPrompt>(&self, prompt: &mut P) -> Result<usize> {
        if self.running.swap(true, Ordering::SeqCst) {
            anyhow::bail!("emotion monitor for '{}' is already running", self.username);
        }

        let (tx, rx) = sync_channel(1);
        let running = Arc::clone(&self.running);
        let interval = self.interval;
        let ticker = thread::spawn(move || tick_loop(interval, running, tx));

        let outcome = self.prompt_loop(&rx, prompt);

        self.running.store(false, Ordering::SeqCst);
        drop(rx);
        let _ = ticker.join();

        outcome
    }

    fn prompt_loop<P: EmotionPrompt>(&self, ticks: &Receiver<()>, prompt: &mut P) -> Result<usize> {
        let mut saved = 0;
        for () in ticks.iter() {
            if !self.is_running() {
                break;
            }
            match prompt.ask(&self.username, self.locale)? {
                // Stopped while the prompt was open: the answer is discarded.
                PromptAnswer::Chose(_) if !self.is_running() => break,
                PromptAnswer::Chose(emotion) => {
                    self.log.save_now(emotion, self.locale)?;
                    saved += 1;
                }
                PromptAnswer::Dismissed => {}
                PromptAnswer::Quit => break,
            }
        }
        Ok(saved)
    }
}

fn tick_loop(interval: Duration, running: Arc<AtomicBool>, tx: SyncSender<()>) {
    while running.load(Ordering::SeqCst) {
        match tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => return,
        }

        let deadline = Instant::now() + interval;
        while running.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(POLL_STEP));
        }
    }
}
