use crate::{ChartRenderer, EnhancementReport, EnhancerConfig, Error, Navigation, Page, Result, TextSnapshot};
use futures::future::join_all;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Ready(oneshot::Sender<Result<EnhancementReport>>),
    Click(String, oneshot::Sender<Result<Option<Navigation>>>),
    Html(oneshot::Sender<String>),
    Location(oneshot::Sender<Option<String>>),
    Snapshot(oneshot::Sender<TextSnapshot>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly page handle backed by a dedicated worker thread.
///
/// The worker thread owns the parsed [`Page`] (the parsed tree is not
/// `Send`) and executes commands sent from async tasks.
#[derive(Clone)]
pub struct Enhancer {
    cmd_tx: Sender<Command>,
}

impl Enhancer {
    /// Parse `html` on a new worker thread.
    pub async fn open(
        html: String,
        base_url: Option<String>,
        config: EnhancerConfig,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let mut page = match Page::from_html(&html, base_url.as_deref(), config) {
                Ok(p) => p,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Ready(resp) => {
                        let _ = resp.send(page.on_ready(renderer.as_ref()));
                    }
                    Command::Click(selector, resp) => {
                        let _ = resp.send(page.click(&selector));
                    }
                    Command::Html(resp) => {
                        let _ = resp.send(page.html());
                    }
                    Command::Location(resp) => {
                        let _ = resp.send(page.location().map(str::to_string));
                    }
                    Command::Snapshot(resp) => {
                        let _ = resp.send(page.text_snapshot());
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        // Wait for the worker to report whether the page parsed
        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Other("Page worker has shut down".into()))
    }

    /// Run the page-ready tasks
    pub async fn ready(&self) -> Result<EnhancementReport> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Ready(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Ready canceled: {}", e)))?
    }

    /// Click the first element matching `selector`
    pub async fn click(&self, selector: &str) -> Result<Option<Navigation>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Click(selector.to_string(), tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Click canceled: {}", e)))?
    }

    /// Serialized document
    pub async fn html(&self) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Html(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Html canceled: {}", e)))
    }

    pub async fn location(&self) -> Result<Option<String>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Location(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Location canceled: {}", e)))
    }

    pub async fn text_snapshot(&self) -> Result<TextSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Snapshot canceled: {}", e)))
    }

    /// Shut down the worker thread.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}

/// Enhance several independent pages concurrently, one worker per page.
///
/// Results come back in input order.
pub async fn enhance_all(
    pages: Vec<String>,
    config: EnhancerConfig,
    renderer: Arc<dyn ChartRenderer>,
) -> Vec<Result<String>> {
    let jobs = pages
        .into_iter()
        .map(|html| enhance_one(html, config.clone(), renderer.clone()));
    join_all(jobs).await
}

async fn enhance_one(html: String, config: EnhancerConfig, renderer: Arc<dyn ChartRenderer>) -> Result<String> {
    let enhancer = Enhancer::open(html, None, config, renderer).await?;
    let ready = enhancer.ready().await;
    let html = enhancer.html().await;
    enhancer.close().await?;
    ready?;
    html
}
