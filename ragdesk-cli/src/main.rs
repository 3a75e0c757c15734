//! ragdesk: operator console for the WhatsApp RAG chatbot admin API
//!
//! Each subcommand stands in for one dashboard screen. Protected commands
//! need a stored credential (`ragdesk login`); when the backend rejects the
//! credential or fails with a 5xx, the redirect the dashboard would follow
//! is reported on stderr.
//!
//! # Subcommands
//! - `login`, `logout`, `whoami`: credential management
//! - `route <path>`: resolve a dashboard path through the guard
//! - `status`, `dashboard`, `test-query`: system overview
//! - `documents`, `conversations`, `users`, `vector`, `analytics`,
//!   `settings`, `rag`: screen actions
//! - `demo <screen>`: canned fixtures, no backend

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use ragdesk_core::models::conversation::{ConversationListParams, ConversationStatusFilter, ConversationSummary};
use ragdesk_core::models::document::{Document, DocumentListParams, UploadOptions, UploadProgress, UploadState};
use ragdesk_core::models::rag::PromptKind;
use ragdesk_core::models::settings::IntegrationService;
use ragdesk_core::models::user::{UserListParams, UserStatusFilter, WhatsAppUser};
use ragdesk_core::models::vector::VectorSearchParams;
use ragdesk_core::models::analytics::AnalyticsParams;
use ragdesk_core::models::{DataFormat, ReportFormat};
use ragdesk_core::{
    guard, mock, page_title, ApiClient, Connection, DocumentStore, FileCredentialStore,
    RagdeskConfig, Route, Session, SystemStore,
};

const DEFAULT_TOP_K: u32 = 5;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "ragdesk",
    version,
    about = "Operator console for the WhatsApp RAG chatbot admin API"
)]
struct Cli {
    /// Config file (TOML); defaults to ./ragdesk.toml when present
    #[arg(long, global = true)]
    config: Option<String>,

    /// Admin API base URL (overrides api.base_url)
    #[arg(long, global = true, env = "RAGDESK_API_URL")]
    server: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and store the access token
    Login {
        #[arg(short, long, env = "RAGDESK_USERNAME")]
        username: String,

        #[arg(short, long, env = "RAGDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored access token
    Logout,

    /// Show whether a credential is stored
    Whoami,

    /// Resolve a dashboard path through the navigation guard
    Route { path: String },

    /// Vector database health
    Status,

    /// Health and headline counters together
    Dashboard,

    /// Run a query through retrieval and generation
    TestQuery { query: String },

    #[command(subcommand)]
    Documents(DocumentCommand),

    #[command(subcommand)]
    Conversations(ConversationCommand),

    #[command(subcommand)]
    Users(UserCommand),

    #[command(subcommand)]
    Vector(VectorCommand),

    #[command(subcommand)]
    Analytics(AnalyticsCommand),

    #[command(subcommand)]
    Settings(SettingsCommand),

    #[command(subcommand)]
    Rag(RagCommand),

    /// Print the canned fixture for a screen (no backend needed)
    Demo {
        #[arg(value_enum)]
        screen: DemoScreen,
    },
}

#[derive(Debug, Subcommand)]
enum DocumentCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Upload one or more files; several files upload concurrently
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Title for a single upload
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content_type: Option<String>,
    },
    Show { id: i64 },
    Chunks { id: i64 },
    Reindex { id: i64 },
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
enum ConversationCommand {
    List {
        #[command(flatten)]
        filter: ConversationFilter,
    },
    Show { id: String },
    Delete { id: String },
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: ConversationFilter,
    },
}

#[derive(Debug, clap::Args)]
struct ConversationFilter {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long)]
    start_date: Option<String>,
    #[arg(long)]
    end_date: Option<String>,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    List {
        #[command(flatten)]
        filter: UserFilter,
    },
    Show { id: String },
    Block { id: String },
    Unblock { id: String },
    Notes { id: String, notes: String },
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: UserFilter,
    },
}

#[derive(Debug, clap::Args)]
struct UserFilter {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_enum)]
    status: Option<UserStatusArg>,
}

#[derive(Debug, Subcommand)]
enum VectorCommand {
    Collections,
    Stats { name: String },
    Search {
        query: String,
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: u32,
        #[arg(long)]
        collection: Option<String>,
    },
    Optimize { collection: Option<String> },
    Rebuild { collection: Option<String> },
    Backup { collection: Option<String> },
}

#[derive(Debug, Subcommand)]
enum AnalyticsCommand {
    Overview {
        #[command(flatten)]
        range: DateRange,
    },
    Messages {
        #[command(flatten)]
        range: DateRange,
    },
    Tokens {
        #[command(flatten)]
        range: DateRange,
    },
    Queries {
        #[command(flatten)]
        range: DateRange,
    },
    Export {
        #[arg(long, value_enum, default_value_t = ReportArg::Csv)]
        format: ReportArg,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        range: DateRange,
    },
}

#[derive(Debug, clap::Args)]
struct DateRange {
    #[arg(long)]
    start_date: Option<String>,
    #[arg(long)]
    end_date: Option<String>,
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    Show,
    TestConnection {
        #[arg(value_enum)]
        service: ServiceArg,
    },
}

#[derive(Debug, Subcommand)]
enum RagCommand {
    Show,
    Prompts,
    SetPrompt {
        #[arg(value_enum)]
        kind: PromptArg,
        template: String,
    },
    Test { query: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportArg {
    Csv,
    Pdf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Active,
    Ended,
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UserStatusArg {
    Active,
    Blocked,
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServiceArg {
    Waha,
    Openai,
    Qdrant,
    Redis,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PromptArg {
    System,
    User,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DemoScreen {
    Status,
    Dashboard,
    Documents,
    Conversations,
    Users,
    Vector,
    Rag,
    Prompts,
    Analytics,
    Messages,
    Tokens,
    Queries,
    Settings,
}

impl From<ExportFormat> for DataFormat {
    fn from(f: ExportFormat) -> Self {
        match f {
            ExportFormat::Csv => DataFormat::Csv,
            ExportFormat::Json => DataFormat::Json,
        }
    }
}

impl From<ReportArg> for ReportFormat {
    fn from(f: ReportArg) -> Self {
        match f {
            ReportArg::Csv => ReportFormat::Csv,
            ReportArg::Pdf => ReportFormat::Pdf,
        }
    }
}

impl From<ServiceArg> for IntegrationService {
    fn from(s: ServiceArg) -> Self {
        match s {
            ServiceArg::Waha => IntegrationService::Waha,
            ServiceArg::Openai => IntegrationService::Openai,
            ServiceArg::Qdrant => IntegrationService::Qdrant,
            ServiceArg::Redis => IntegrationService::Redis,
        }
    }
}

impl From<PromptArg> for PromptKind {
    fn from(k: PromptArg) -> Self {
        match k {
            PromptArg::System => PromptKind::System,
            PromptArg::User => PromptKind::User,
        }
    }
}

impl From<ConversationFilter> for ConversationListParams {
    fn from(f: ConversationFilter) -> Self {
        ConversationListParams {
            page: f.page,
            limit: f.limit,
            search: f.search,
            status: f.status.map(|s| match s {
                StatusArg::Active => ConversationStatusFilter::Active,
                StatusArg::Ended => ConversationStatusFilter::Ended,
                StatusArg::All => ConversationStatusFilter::All,
            }),
            start_date: f.start_date,
            end_date: f.end_date,
        }
    }
}

impl From<UserFilter> for UserListParams {
    fn from(f: UserFilter) -> Self {
        UserListParams {
            page: f.page,
            limit: f.limit,
            search: f.search,
            status: f.status.map(|s| match s {
                UserStatusArg::Active => UserStatusFilter::Active,
                UserStatusArg::Blocked => UserStatusFilter::Blocked,
                UserStatusArg::All => UserStatusFilter::All,
            }),
        }
    }
}

impl From<DateRange> for AnalyticsParams {
    fn from(r: DateRange) -> Self {
        AnalyticsParams {
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

impl Commands {
    /// Dashboard screen the command acts on; `None` for commands that
    /// never touch a protected screen.
    fn route(&self) -> Option<Route> {
        let route = match self {
            Commands::Login { .. } => Route::Login,
            Commands::Status | Commands::Dashboard => Route::Dashboard,
            Commands::TestQuery { .. } => Route::Test,
            Commands::Documents(DocumentCommand::List { .. }) => Route::Documents,
            Commands::Documents(DocumentCommand::Upload { .. }) => Route::DocumentsUpload,
            Commands::Documents(
                DocumentCommand::Show { id }
                | DocumentCommand::Chunks { id }
                | DocumentCommand::Reindex { id }
                | DocumentCommand::Delete { id },
            ) => Route::DocumentDetail(id.to_string()),
            Commands::Conversations(_) => Route::Conversations,
            Commands::Users(_) => Route::Users,
            Commands::Vector(_) => Route::VectorDb,
            Commands::Analytics(_) => Route::Analytics,
            Commands::Settings(_) => Route::Settings,
            Commands::Rag(_) => Route::RagConfig,
            Commands::Logout | Commands::Whoami | Commands::Route { .. } | Commands::Demo { .. } => {
                return None
            }
        };
        Some(route)
    }
}

// ============================================================================
// Navigation
// ============================================================================

enum Entry {
    Proceed,
    AlreadySignedIn,
}

/// Run the navigation guard for `route` and record the visit.
fn enter(session: &Session, route: Route) -> anyhow::Result<Entry> {
    let resolved = guard(route.clone(), session.is_authenticated());
    if resolved == route {
        session.visit(route);
        return Ok(Entry::Proceed);
    }
    match resolved {
        Route::Login => bail!("not logged in (run `ragdesk login` first)"),
        Route::Dashboard => Ok(Entry::AlreadySignedIn),
        other => bail!("cannot open {}: redirected to {}", route, other),
    }
}

fn report_redirect(session: &Session) {
    if let Some(route) = session.take_redirect() {
        match route {
            Route::Login => eprintln!("ragdesk: session expired, redirected to {}; run `ragdesk login`", route),
            Route::ServerError => eprintln!("ragdesk: backend failure, redirected to {}", route),
            other => eprintln!("ragdesk: redirected to {}", other),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Print `value` as pretty JSON, or through `human` for text output.
fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

fn write_export(bytes: &[u8], output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {} to {}", format_bytes(bytes.len() as u64), path.display());
        }
        None => std::io::stdout().write_all(bytes)?,
    }
    Ok(())
}

/// Human-readable size: B, KB, MB with one decimal above bytes.
pub fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    let f = n as f64;
    if f < KB {
        format!("{} B", n)
    } else if f < KB * KB {
        format!("{:.1} KB", f / KB)
    } else {
        format!("{:.1} MB", f / (KB * KB))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

pub fn document_row(d: &Document) -> String {
    let chunks = d
        .chunks_count
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>5}  {:<40}  {:<10}  {:>6} chunks  {}",
        d.id,
        truncate(&d.title, 40),
        format!("{:?}", d.status).to_lowercase(),
        chunks,
        d.upload_date
    )
}

pub fn conversation_row(c: &ConversationSummary) -> String {
    let who = match &c.name {
        Some(name) => format!("{} ({})", c.phone, name),
        None => c.phone.clone(),
    };
    format!(
        "{:>6}  {:<36}  {:>4} msgs  {}  {}",
        c.id,
        truncate(&who, 36),
        c.message_count,
        c.last_message_time,
        truncate(&c.last_message, 50)
    )
}

pub fn user_row(u: &WhatsAppUser) -> String {
    format!(
        "{:>6}  {:<18}  {:<20}  {:>4} msgs  {:?}",
        u.id,
        u.phone,
        truncate(u.name.as_deref().unwrap_or("-"), 20),
        u.messages_count,
        u.status
    )
}

pub fn progress_line(p: &UploadProgress) -> String {
    match p.status {
        UploadState::Uploading => format!("{:<40} {:>3}%", p.filename, p.progress),
        UploadState::Success => format!("{:<40} {:>3}% done", p.filename, p.progress),
        UploadState::Error => format!(
            "{:<40} failed: {}",
            p.filename,
            p.error.as_deref().unwrap_or("Upload failed")
        ),
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn run(cli: Cli, mut config: RagdeskConfig) -> anyhow::Result<()> {
    let json = cli.json;

    if let Commands::Demo { screen } = cli.command {
        return show_demo(screen);
    }

    if let Some(server) = cli.server {
        config.api.base_url = server;
    }

    let store = FileCredentialStore::new(config.session.resolved_token_path());
    let session = Arc::new(Session::open(Box::new(store))?);
    let conn = ApiClient::new(&config.api)?.bind(session.clone());
    tracing::debug!(base_url = conn.client.base_url(), "Admin API");

    if let Some(route) = cli.command.route() {
        if let Entry::AlreadySignedIn = enter(&session, route)? {
            eprintln!("Already logged in; run `ragdesk logout` to switch accounts.");
            return Ok(());
        }
    }

    let result = dispatch(&conn, cli.command, json, &config).await;
    report_redirect(&session);
    result
}

async fn dispatch(conn: &Connection, command: Commands, json: bool, config: &RagdeskConfig) -> anyhow::Result<()> {
    let client = &conn.client;
    let session = conn.session.as_ref();

    match command {
        Commands::Login { username, password } => {
            let user = client.login(session, &username, &password).await?;
            let name = user.map(|u| u.username).unwrap_or(username);
            println!("Logged in as {}", name);
            session.visit(guard(Route::Login, session.is_authenticated()));
        }
        Commands::Logout => {
            client.logout(session)?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let authenticated = session.check_auth()?;
            let info = serde_json::json!({
                "authenticated": authenticated,
                "server": client.base_url(),
                "token_path": config.session.resolved_token_path(),
            });
            emit(json, &info, |_| {
                if authenticated {
                    println!("Logged in to {}", client.base_url());
                } else {
                    println!("Not logged in ({})", client.base_url());
                }
            })?;
        }
        Commands::Route { path } => {
            let route = Route::parse(&path);
            let resolved = guard(route.clone(), session.is_authenticated());
            let info = serde_json::json!({
                "path": route.path(),
                "name": route.name(),
                "title": page_title(&route),
                "requires_auth": route.requires_auth(),
                "resolves_to": resolved.path(),
            });
            emit(json, &info, |_| {
                println!("{}  {}", route.path(), page_title(&route));
                if resolved != route {
                    println!("-> {}", resolved);
                }
            })?;
        }
        Commands::Status => {
            let status = client.system_status(session).await?;
            emit(json, &status, |s| {
                println!("Vector DB:  {}", s.qdrant.status);
                println!("Collection: {}", s.qdrant.collection);
                println!("Vectors:    {}", s.qdrant.vectors);
                println!("Points:     {}", s.qdrant.points);
                println!("URL:        {}", s.qdrant.url);
                println!("Checked:    {}", s.timestamp);
            })?;
        }
        Commands::Dashboard => {
            let store = SystemStore::new(Arc::new(conn.clone()));
            store.fetch_all().await;
            let state = store.snapshot();
            emit(json, &state, |s| {
                if let Some(status) = &s.status {
                    println!("Vector DB:       {} ({} vectors)", status.qdrant.status, status.qdrant.vectors);
                }
                if let Some(a) = &s.analytics {
                    println!("Total messages:  {}", a.total_messages);
                    println!("Today:           {}", a.today_messages);
                    println!("Last 7 days:     {}", a.recent_messages_7d);
                    println!("Total tokens:    {}", a.total_tokens);
                    println!("Avg response:    {:.0} ms", a.avg_response_time_ms);
                }
            })?;
            if let Some(err) = state.error {
                bail!(err);
            }
        }
        Commands::TestQuery { query } => {
            let result = client.test_query(session, &query).await?;
            emit(json, &result, |r| {
                println!("{}\n", r.response);
                for src in &r.sources {
                    println!("  [{:.2}] {} (#{})", src.score, src.title, src.id);
                }
                println!("\n{} tokens, {:.0} ms", r.tokens, r.time_ms);
            })?;
        }
        Commands::Documents(cmd) => documents(conn, cmd, json).await?,
        Commands::Conversations(cmd) => conversations(conn, cmd, json).await?,
        Commands::Users(cmd) => users(conn, cmd, json).await?,
        Commands::Vector(cmd) => vector(conn, cmd, json).await?,
        Commands::Analytics(cmd) => analytics(conn, cmd, json).await?,
        Commands::Settings(cmd) => settings(conn, cmd, json).await?,
        Commands::Rag(cmd) => rag(conn, cmd, json).await?,
        Commands::Demo { screen } => show_demo(screen)?,
    }
    Ok(())
}

async fn documents(conn: &Connection, cmd: DocumentCommand, json: bool) -> anyhow::Result<()> {
    let store = Arc::new(DocumentStore::new(Arc::new(conn.clone())));

    match cmd {
        DocumentCommand::List { search, status, page, limit } => {
            let params = DocumentListParams { search, status, page, limit };
            store.fetch_documents(&params).await;
            let state = store.snapshot();
            if let Some(err) = state.error {
                bail!(err);
            }
            emit(json, &state.documents, |docs| {
                for d in docs {
                    println!("{}", document_row(d));
                }
                println!("{} of {} documents", docs.len(), state.total);
            })?;
        }
        DocumentCommand::Upload { files, title, content_type } => {
            let result = if files.len() == 1 {
                let options = UploadOptions { title, content_type };
                store.upload_document(&files[0], &options).await.map(|r| vec![r])
            } else {
                if title.is_some() || content_type.is_some() {
                    eprintln!("ragdesk: --title/--content-type apply to single uploads only");
                }
                store.upload_multiple(files).await
            };
            let state = store.snapshot();
            if !json {
                for p in &state.upload_progress {
                    println!("{}", progress_line(p));
                }
            }
            let results = result?;
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        DocumentCommand::Show { id } => {
            let doc = store.document(id).await?;
            emit(json, &doc, |d| {
                println!("{}", d.title);
                println!("ID:       {}", d.id);
                println!("Type:     {}", d.file_type);
                println!("Size:     {}", format_bytes(d.file_size));
                println!("Status:   {:?}", d.status);
                println!("Uploaded: {}", d.upload_date);
                if let Some(c) = d.chunks_count {
                    println!("Chunks:   {}", c);
                }
            })?;
        }
        DocumentCommand::Chunks { id } => {
            let chunks = store.chunks(id).await?;
            emit(json, &chunks, |chunks| {
                for c in chunks {
                    println!("#{:<4} ({} chars)  {}", c.chunk_index, c.chunk_size, truncate(&c.chunk_text, 80));
                }
            })?;
        }
        DocumentCommand::Reindex { id } => {
            let ack = store.reindex_document(id).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "Reindex requested")))?;
        }
        DocumentCommand::Delete { id } => {
            store.delete_document(id).await?;
            println!("Deleted document {}", id);
        }
    }
    Ok(())
}

async fn conversations(conn: &Connection, cmd: ConversationCommand, json: bool) -> anyhow::Result<()> {
    let (client, session) = (&conn.client, conn.session.as_ref());

    match cmd {
        ConversationCommand::List { filter } => {
            let params = ConversationListParams::from(filter);
            let page = client.list_conversations(session, &params).await?;
            emit(json, &page, |p| {
                for c in &p.conversations {
                    println!("{}", conversation_row(c));
                }
                println!(
                    "page {} ({} conversations shown, {} messages total)",
                    p.page,
                    p.conversations.len(),
                    p.total
                );
            })?;
        }
        ConversationCommand::Show { id } => {
            let detail = client.conversation(session, &id).await?;
            println!("{}", serde_json::to_string_pretty(&detail.conversation)?);
        }
        ConversationCommand::Delete { id } => {
            let ack = client.delete_conversation(session, &id).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "Conversation deleted")))?;
        }
        ConversationCommand::Export { format, output, filter } => {
            let params = ConversationListParams::from(filter);
            let bytes = client
                .export_conversations(session, format.into(), &params)
                .await?;
            write_export(&bytes, output.as_ref())?;
        }
    }
    Ok(())
}

async fn users(conn: &Connection, cmd: UserCommand, json: bool) -> anyhow::Result<()> {
    let (client, session) = (&conn.client, conn.session.as_ref());

    match cmd {
        UserCommand::List { filter } => {
            let params = UserListParams::from(filter);
            let page = client.list_users(session, &params).await?;
            emit(json, &page, |p| {
                for u in &p.users {
                    println!("{}", user_row(u));
                }
                println!("{} users", p.total);
            })?;
        }
        UserCommand::Show { id } => {
            let detail = client.user(session, &id).await?;
            emit(json, &detail, |d| {
                let u = &d.user;
                println!("{}", user_row(&u.user));
                if let Some(notes) = &u.user.notes {
                    println!("Notes: {}", notes);
                }
                println!("Tokens used: {}", u.total_tokens_used);
                for c in &u.conversations {
                    println!("  {:>6}  {:>4} msgs  {}", c.id, c.message_count, truncate(&c.last_message, 60));
                }
            })?;
        }
        UserCommand::Block { id } => {
            let ack = client.block_user(session, &id).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "User blocked")))?;
        }
        UserCommand::Unblock { id } => {
            let ack = client.unblock_user(session, &id).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "User unblocked")))?;
        }
        UserCommand::Notes { id, notes } => {
            let ack = client.update_user_notes(session, &id, &notes).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "Notes saved")))?;
        }
        UserCommand::Export { format, output, filter } => {
            let params = UserListParams::from(filter);
            let bytes = client.export_users(session, format.into(), &params).await?;
            write_export(&bytes, output.as_ref())?;
        }
    }
    Ok(())
}

async fn vector(conn: &Connection, cmd: VectorCommand, json: bool) -> anyhow::Result<()> {
    let (client, session) = (&conn.client, conn.session.as_ref());

    match cmd {
        VectorCommand::Collections => {
            let resp = client.vector_collections(session).await?;
            emit(json, &resp, |r| {
                for c in &r.collections {
                    println!(
                        "{:<20} {:>8} vectors  {:>8} points  {:<6} {}",
                        c.name,
                        c.vectors_count,
                        c.points_count,
                        c.status,
                        format_bytes(c.disk_data_size)
                    );
                }
            })?;
        }
        VectorCommand::Stats { name } => {
            let stats = client.collection_stats(session, &name).await?;
            emit(json, &stats, |s| {
                let c = &s.collection;
                println!("{}: {} vectors, {} indexed, {} segments", c.name, c.vectors_count, c.indexed_vectors_count, c.segments_count);
                for (field, schema) in &s.payload_schema {
                    println!("  {}: {}", field, schema);
                }
            })?;
        }
        VectorCommand::Search { query, top_k, collection } => {
            let params = VectorSearchParams { query, top_k, collection };
            let resp = client.vector_search(session, &params).await?;
            emit(json, &resp, |r| {
                if r.results.is_empty() {
                    eprintln!("No results found for: {}", r.query);
                }
                for hit in &r.results {
                    println!("[{:.3}] {}", hit.score, truncate(&hit.payload.text, 100));
                }
            })?;
        }
        VectorCommand::Optimize { collection } => {
            let ack = client.optimize_collection(session, collection.as_deref()).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "Optimization started")))?;
        }
        VectorCommand::Rebuild { collection } => {
            let ack = client.rebuild_collection(session, collection.as_deref()).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "Rebuild started")))?;
        }
        VectorCommand::Backup { collection } => {
            let ack = client.backup_collection(session, collection.as_deref()).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "Backup created")))?;
        }
    }
    Ok(())
}

async fn analytics(conn: &Connection, cmd: AnalyticsCommand, json: bool) -> anyhow::Result<()> {
    let (client, session) = (&conn.client, conn.session.as_ref());

    match cmd {
        AnalyticsCommand::Overview { range } => {
            let resp = client.analytics_overview(session, &range.into()).await?;
            emit(json, &resp, |r| {
                let d = &r.data;
                println!("Messages:      {} total, {} today, {} 7d, {} 30d", d.total_messages, d.messages_today, d.messages_7d, d.messages_30d);
                println!("Active users:  {}", d.active_users);
                println!("Tokens:        {}", d.total_tokens);
                println!("Avg response:  {:.0} ms", d.avg_response_time_ms);
                for u in &d.top_users {
                    println!("  {:<18} {:>5}  {}", u.phone, u.message_count, u.name.as_deref().unwrap_or(""));
                }
            })?;
        }
        AnalyticsCommand::Messages { range } => {
            let series = client.messages_chart(session, &range.into()).await?;
            emit(json, &series, |s| {
                for p in &s.data {
                    println!("{}  {:>6}", p.date, p.count);
                }
            })?;
        }
        AnalyticsCommand::Tokens { range } => {
            let series = client.tokens_chart(session, &range.into()).await?;
            emit(json, &series, |s| {
                for p in &s.data {
                    println!("{}  {:>8}", p.date, p.tokens);
                }
            })?;
        }
        AnalyticsCommand::Queries { range } => {
            let series = client.popular_queries(session, &range.into()).await?;
            emit(json, &series, |s| {
                for q in &s.data {
                    println!("{:>5}  {:<50} {:.0} ms", q.count, truncate(&q.query, 50), q.avg_response_time_ms);
                }
            })?;
        }
        AnalyticsCommand::Export { format, output, range } => {
            let bytes = client
                .export_analytics(session, format.into(), &range.into())
                .await?;
            write_export(&bytes, output.as_ref())?;
        }
    }
    Ok(())
}

async fn settings(conn: &Connection, cmd: SettingsCommand, json: bool) -> anyhow::Result<()> {
    let (client, session) = (&conn.client, conn.session.as_ref());

    match cmd {
        SettingsCommand::Show => {
            let resp = client.settings(session).await?;
            emit(json, &resp, |r| {
                let s = &r.settings;
                println!("Chatbot:       {}", s.general.chatbot_name);
                println!("Language:      {}", s.general.default_language);
                println!("Timezone:      {}", s.general.timezone);
                let hours = &s.general.business_hours;
                println!(
                    "Hours:         {} {}-{} days {:?}",
                    if hours.enabled { "on" } else { "off" },
                    hours.start,
                    hours.end,
                    hours.days
                );
                let rl = &s.rate_limiting;
                println!(
                    "Rate limit:    {} {}/min {}/day",
                    if rl.enabled { "on" } else { "off" },
                    rl.messages_per_minute,
                    rl.daily_limit
                );
                for i in [&s.integrations.waha, &s.integrations.openai, &s.integrations.qdrant, &s.integrations.redis] {
                    println!("  {:<8} {:?}", i.service, i.status);
                }
            })?;
        }
        SettingsCommand::TestConnection { service } => {
            let resp = client.test_connection(session, service.into()).await?;
            emit(json, &resp, |r| println!("{}: {}", r.service, r.message))?;
        }
    }
    Ok(())
}

async fn rag(conn: &Connection, cmd: RagCommand, json: bool) -> anyhow::Result<()> {
    let (client, session) = (&conn.client, conn.session.as_ref());

    match cmd {
        RagCommand::Show => {
            let resp = client.rag_config(session).await?;
            emit(json, &resp, |r| {
                let (llm, ret) = (&r.config.llm, &r.config.retrieval);
                println!("Model:        {} (temperature {}, max_tokens {}, top_p {})", llm.model, llm.temperature, llm.max_tokens, llm.top_p);
                println!("Retrieval:    top_k {}, threshold {}", ret.top_k, ret.similarity_threshold);
                println!("Chunking:     {} / {} overlap", ret.chunk_size, ret.chunk_overlap);
            })?;
        }
        RagCommand::Prompts => {
            let resp = client.prompts(session).await;
            if !resp.success {
                eprintln!("ragdesk: could not load prompts, showing defaults");
            }
            emit(json, &resp, |r| {
                println!("System prompt:\n{}\n", r.prompts.system);
                println!("User prompt:\n{}", r.prompts.user);
            })?;
        }
        RagCommand::SetPrompt { kind, template } => {
            let ack = client.update_prompt(session, kind.into(), &template).await?;
            emit(json, &ack, |a| println!("{}", non_blank(&a.message, "Prompt updated")))?;
        }
        RagCommand::Test { query } => {
            let resp = client.test_rag(session, &query).await?;
            emit(json, &resp, |r| {
                println!("{}\n", r.response);
                for c in &r.context_used {
                    println!("  [{:.2}] {}: {}", c.score, c.document_title, truncate(&c.chunk_text, 80));
                }
                println!("\n{} tokens, {:.0} ms", r.tokens_used, r.time_ms);
            })?;
        }
    }
    Ok(())
}

/// Fixtures print as JSON in both output modes.
fn show_demo(screen: DemoScreen) -> anyhow::Result<()> {
    let now = chrono::Utc::now();
    let value = match screen {
        DemoScreen::Status => serde_json::to_value(mock::system_status(now))?,
        DemoScreen::Dashboard => serde_json::to_value(mock::dashboard_stats())?,
        DemoScreen::Documents => serde_json::to_value(mock::documents(now))?,
        DemoScreen::Conversations => serde_json::to_value(mock::conversations(now))?,
        DemoScreen::Users => serde_json::to_value(mock::users(now))?,
        DemoScreen::Vector => serde_json::to_value(mock::vector_collections())?,
        DemoScreen::Rag => serde_json::to_value(mock::rag_config())?,
        DemoScreen::Prompts => serde_json::to_value(mock::prompts())?,
        DemoScreen::Analytics => serde_json::to_value(mock::analytics_overview())?,
        DemoScreen::Messages => serde_json::to_value(mock::messages_chart(now))?,
        DemoScreen::Tokens => serde_json::to_value(mock::tokens_chart(now))?,
        DemoScreen::Queries => serde_json::to_value(mock::popular_queries())?,
        DemoScreen::Settings => serde_json::to_value(mock::settings())?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn non_blank<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.trim().is_empty() {
        fallback
    } else {
        s
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match RagdeskConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ragdesk: failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let directive = config
        .log
        .level
        .parse()
        .unwrap_or_else(|_| tracing::Level::INFO.into());
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();

    if let Err(e) = run(cli, config).await {
        eprintln!("ragdesk: {:#}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
