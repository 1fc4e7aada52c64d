use std::future::Future;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_channel::{Receiver, Sender, bounded};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::time::{Instant, sleep};
use toaster::Result;
use toaster::config::{Config, PageSettings};
use toaster::contact::{self, ContactForm, SubmitButton};
use toaster::error::{ConfigError, Error as ToasterError, ScriptError};
use toaster::interaction::{Interaction, InteractionBus};
use toaster::page::{
    ActiveNav, FrameGate, HeaderTracker, INITIAL_HIGHLIGHT_DELAY, MenuClick, NavMenu, Section,
    scroll_target,
};
use toaster::presenter::Presenter;
use toaster::surface::{DisplaySurface, MemorySurface};
use toaster::telemetry::init_tracing;
use tracing::{info, warn};

use super::cli::Cli;
use super::script::{ClickTarget, Command, MenuAction, parse_line};

const DEFAULT_CONFIG: &str = "toaster.toml";
const COMMAND_QUEUE: usize = 32;
const DRAIN_POLL: Duration = Duration::from_millis(50);

type ScriptSource = Box<dyn AsyncBufRead + Unpin + Send>;

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.log_format)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = Config::from_env_and_file(&config_path)?;

    if let Some(auto_dismiss) = cli.auto_dismiss {
        if auto_dismiss <= config.timings.outside_click_grace {
            return Err(ToasterError::from(ConfigError::InvalidField {
                field: "cli.auto_dismiss",
                message: "value must be longer than the outside-click grace period".to_string(),
            }));
        }
        config.timings.auto_dismiss = auto_dismiss;
    }
    if let Some(delay) = cli.submit_delay {
        config.contact.submit_delay = delay;
    }

    let source = open_source(cli.script.clone()).await?;

    let surface = Arc::new(MemorySurface::new());
    let presenter = Presenter::new(
        Arc::clone(&surface) as Arc<dyn DisplaySurface>,
        InteractionBus::new(config.interaction_capacity),
        config.timings,
    )?;

    let (tx, rx) = bounded(COMMAND_QUEUE);
    let reader = tokio::spawn(read_commands(source, tx));

    let mut session = Session::new(presenter.clone(), Arc::clone(&surface), &config);
    let interrupt = interrupt_signal();
    tokio::pin!(interrupt);

    let end = drive(&mut session, &rx, interrupt.as_mut()).await;
    rx.close();
    reader.abort();

    if cli.drain && end == SessionEnd::Finished {
        tokio::select! {
            () = session.drain() => {}
            () = interrupt.as_mut() => info!("drain interrupted"),
        }
    }
    presenter.shutdown();
    info!(surface_ops = surface.log().len(), "session finished");
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum SessionEnd {
    /// The script ran out or asked to quit.
    Finished,
    Interrupted,
}

/// Resolves on ctrl-c. If the handler cannot be installed it never resolves.
async fn interrupt_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

/// Runs queued commands until the queue closes, a command quits, or
/// `interrupt` resolves. The interrupt is raced against the command in
/// flight, so a long `wait` or `submit` is cut short.
pub(super) async fn drive<I>(
    session: &mut Session,
    rx: &Receiver<Command>,
    interrupt: I,
) -> SessionEnd
where
    I: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    loop {
        let step = async {
            match rx.recv().await {
                Ok(command) => session.execute(command).await,
                Err(_) => ControlFlow::Break(()),
            }
        };
        tokio::select! {
            biased;
            () = &mut interrupt => {
                info!("shutdown signal received, stopping session");
                return SessionEnd::Interrupted;
            }
            flow = step => {
                if flow.is_break() {
                    return SessionEnd::Finished;
                }
            }
        }
    }
}

async fn open_source(script: Option<PathBuf>) -> Result<ScriptSource> {
    match script {
        Some(path) => {
            let file = File::open(&path)
                .await
                .map_err(|source| ScriptError::Read { path, source })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}

async fn read_commands(source: ScriptSource, tx: Sender<Command>) {
    let mut lines = source.lines();
    let mut line_no = 0usize;
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                line_no += 1;
                match parse_line(line_no, &line) {
                    Ok(Some(command)) => {
                        if tx.send(command).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "script line ignored"),
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, line = line_no + 1, "failed to read script");
                break;
            }
        }
    }
}

/// Page state driven by script commands.
pub(super) struct Session {
    presenter: Presenter,
    surface: Arc<MemorySurface>,
    form: ContactForm,
    button: SubmitButton,
    submit_delay: Duration,
    header: HeaderTracker,
    menu: NavMenu,
    nav: ActiveNav,
    highlight_gate: FrameGate,
    /// Deadline of the on-load highlight, cleared once it ran.
    initial_highlight: Option<Instant>,
    sections: Vec<Section>,
    page: PageSettings,
    scroll_y: f64,
}

impl Session {
    pub(super) fn new(presenter: Presenter, surface: Arc<MemorySurface>, config: &Config) -> Self {
        Self {
            presenter,
            surface,
            form: ContactForm::default(),
            button: SubmitButton::default(),
            submit_delay: config.contact.submit_delay,
            header: HeaderTracker::new(config.page.header_hide_after),
            menu: NavMenu::default(),
            nav: ActiveNav::default(),
            highlight_gate: FrameGate::default(),
            initial_highlight: Instant::now().checked_add(INITIAL_HIGHLIGHT_DELAY),
            sections: Vec::new(),
            page: config.page.clone(),
            scroll_y: 0.0,
        }
    }

    pub(super) async fn execute(&mut self, command: Command) -> ControlFlow<()> {
        self.catch_up();
        match command {
            Command::Present { severity, message } => {
                self.presenter.present_str(message, Some(&severity));
            }
            Command::Close | Command::Click(ClickTarget::Close) => self.close_current(),
            Command::Hover(hovered) => match self.presenter.current() {
                Some(current) => {
                    self.presenter.hover_close(current.id, hovered);
                }
                None => warn!("no notification to hover"),
            },
            Command::Click(ClickTarget::Inside) => match self.presenter.current() {
                Some(current) => {
                    self.presenter.bus().publish(Interaction::on(current.root));
                }
                None => warn!("no notification to click"),
            },
            Command::Click(ClickTarget::Outside) => {
                self.presenter.bus().publish(Interaction::background());
                self.menu.on_click(MenuClick::Elsewhere);
            }
            Command::Wait(duration) => {
                sleep(duration).await;
                self.catch_up();
            }
            Command::Submit(form) => {
                self.form = form;
                let sent =
                    contact::submit(&mut self.form, &self.button, &self.presenter, self.submit_delay)
                        .await;
                match sent {
                    Ok(submission) => info!(name = %submission.name, "contact message accepted"),
                    Err(err) => info!(field = ?err.field(), "contact form needs attention"),
                }
            }
            Command::Scroll(top) => self.scroll_to(top),
            Command::Section { id, top, height } => {
                self.sections.push(Section::new(id, top, height));
            }
            Command::Goto(id) => self.goto(&id),
            Command::Menu(action) => {
                match action {
                    MenuAction::Toggle => self.menu.on_click(MenuClick::Toggle),
                    MenuAction::Link => self.menu.navigate(),
                    MenuAction::ClickOutside => self.menu.on_click(MenuClick::Elsewhere),
                }
                info!(open = self.menu.is_open(), "navigation menu");
            }
            Command::Show => {
                info!(
                    active = self.nav.current().unwrap_or("-"),
                    submit = self.button.label(),
                    menu_open = self.menu.is_open(),
                    "page state"
                );
                let rendered = self.surface.render();
                if rendered.is_empty() {
                    println!("(no notification)");
                } else {
                    println!("{rendered}");
                }
            }
            Command::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// The close control is itself a click inside the toast, then the close action.
    fn close_current(&self) {
        match self.presenter.current() {
            Some(current) => {
                self.presenter.bus().publish(Interaction::on(current.close_button));
                self.presenter.close(current.id);
            }
            None => warn!("no notification to close"),
        }
    }

    /// Runs page updates whose time has come: the on-load highlight and a
    /// scroll highlight deferred to the next frame.
    fn catch_up(&mut self) {
        let now = Instant::now();
        if self.initial_highlight.is_some_and(|at| now >= at) {
            self.initial_highlight = None;
            self.highlight();
        }
        if self.highlight_gate.flush(now) {
            self.highlight();
        }
    }

    fn highlight(&mut self) {
        self.nav
            .track(&self.sections, self.scroll_y, self.page.section_offset);
    }

    fn scroll_to(&mut self, top: f64) {
        self.scroll_y = top.max(0.0);
        let header = self.header.on_scroll(top);
        if self.highlight_gate.request(Instant::now()) {
            self.highlight();
        }
        info!(
            scroll = top,
            header = header.transform(),
            active = self.nav.current().unwrap_or("-"),
            "page scrolled"
        );
    }

    fn goto(&mut self, id: &str) {
        let Some(section) = self.sections.iter().find(|s| s.id == id) else {
            warn!(section = id, "target section not found");
            return;
        };
        let target = scroll_target(
            section.top - self.scroll_y,
            self.scroll_y,
            self.page.header_height,
        );
        self.menu.navigate();
        self.nav.select(id);
        info!(section = id, target, "smooth scroll");
        self.scroll_to(target);
    }

    /// Waits for the current notification to leave on its own.
    ///
    /// Gives up after one full lifecycle; with a lifecycle too long to
    /// express as a deadline it waits without one.
    pub(super) async fn drain(&self) {
        let timings = self.presenter.timings();
        let budget = timings
            .auto_dismiss
            .saturating_add(timings.exit_animation)
            .saturating_add(DRAIN_POLL);
        let deadline = Instant::now().checked_add(budget);
        while !self.presenter.is_empty() && deadline.is_none_or(|at| Instant::now() < at) {
            sleep(DRAIN_POLL).await;
        }
    }
}
