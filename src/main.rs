use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use eden_jarvis::auth::AuthGate;
use eden_jarvis::config::Config;
use eden_jarvis::error_codes::{code_for, CodedError, CodedErrorKind};
use eden_jarvis::generation::{GeminiTransport, GenerationClient};
use eden_jarvis::model::{
    AdEconomicsReport, AdInputs, AdvertiserBrief, ProposalInputs, ScenePlanItem, ScriptResult,
    ShotCategory, ShotRecord, StaffAccount,
};
use eden_jarvis::records::RecordService;
use eden_jarvis::seed::SYSTEM_NAME;
use eden_jarvis::shell::{AppState, Tab};
use eden_jarvis::store::{FileBackend, Store};

const LONG_VERSION: &str = match option_env!("JARVIS_GIT_HASH") {
    Some(hash) => hash,
    None => env!("CARGO_PKG_VERSION"),
};

#[derive(Debug, Parser)]
#[command(name = "jarvis")]
#[command(about = "EDEN BEAUTY Jarvis: viral scripts, shot plans, ad economics and proposals")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Directory holding the shot and staff collections (env: JARVIS_DATA_DIR)
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,
    /// Print results and errors as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed both collections if they are not stored yet
    Init,
    /// Check staff credentials
    Login(StaffLogin),
    #[command(subcommand)]
    Shots(ShotsCommand),
    #[command(subcommand)]
    Staff(StaffCommand),
    #[command(subcommand)]
    Script(ScriptCommand),
    /// Match each sentence of a script to reference shots
    Scene {
        #[command(flatten)]
        login: StaffLogin,
        #[arg(long)]
        file: PathBuf,
    },
    /// Break-even analysis, or a pre-launch simulation when metrics are missing
    Economics {
        #[command(flatten)]
        login: StaffLogin,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        margin: f64,
        #[arg(long, default_value_t = 0.0)]
        cpm: f64,
        #[arg(long, default_value_t = 0.0)]
        ctr: f64,
        #[arg(long, default_value_t = 0.0)]
        cvr: f64,
    },
    /// Render a one-page HTML proposal
    Proposal {
        #[command(flatten)]
        login: StaffLogin,
        #[arg(long = "client-name")]
        client_name: String,
        #[arg(long = "main-product")]
        main_product: String,
        /// Monthly brand search volume, oldest first; up to four values
        #[arg(long = "volume", num_args = 1..=4)]
        volume: Vec<String>,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct StaffLogin {
    #[arg(long)]
    id: String,
    #[arg(long)]
    pw: String,
}

#[derive(Debug, Args)]
struct AdminLogin {
    #[arg(long = "admin-id")]
    admin_id: String,
    #[arg(long = "admin-pw")]
    admin_pw: String,
}

#[derive(Debug, Subcommand)]
enum ShotsCommand {
    List {
        #[command(flatten)]
        login: StaffLogin,
        #[arg(long)]
        category: Option<ShotCategory>,
    },
    Add {
        #[command(flatten)]
        admin: AdminLogin,
        /// Defaults to a generated id
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        category: ShotCategory,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        action: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        link: String,
    },
    Update {
        #[command(flatten)]
        admin: AdminLogin,
        #[arg(long)]
        id: String,
        #[arg(long)]
        category: Option<ShotCategory>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        link: Option<String>,
    },
    Delete {
        #[command(flatten)]
        admin: AdminLogin,
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum StaffCommand {
    List {
        #[command(flatten)]
        admin: AdminLogin,
    },
    Add {
        #[command(flatten)]
        admin: AdminLogin,
        #[arg(long)]
        id: String,
        #[arg(long)]
        pw: String,
    },
    Delete {
        #[command(flatten)]
        admin: AdminLogin,
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum ScriptCommand {
    /// Write a new script from an advertiser brief
    Generate {
        #[command(flatten)]
        login: StaffLogin,
        #[command(flatten)]
        brief: BriefArgs,
        /// Hand the finished script straight to the scene planner
        #[arg(long = "scene-plan", default_value_t = false)]
        scene_plan: bool,
    },
    /// Rewrite an existing script under the same rules
    Tune {
        #[command(flatten)]
        login: StaffLogin,
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
struct BriefArgs {
    #[arg(long = "client-name", default_value = "")]
    client_name: String,
    #[arg(long, default_value = "")]
    purpose: String,
    #[arg(long = "target-audience", default_value = "")]
    target_audience: String,
    #[arg(long = "key-message", default_value = "")]
    key_message: String,
    #[arg(long, default_value = "")]
    usp: String,
    #[arg(long, default_value = "")]
    promotion: String,
    #[arg(long, default_value = "")]
    constraints: String,
    #[arg(long, default_value = "")]
    requests: String,
    #[arg(long = "special-story", default_value = "")]
    special_story: String,
}

impl From<BriefArgs> for AdvertiserBrief {
    fn from(args: BriefArgs) -> Self {
        Self {
            client_name: args.client_name,
            purpose: args.purpose,
            target_audience: args.target_audience,
            key_message: args.key_message,
            usp: args.usp,
            promotion: args.promotion,
            constraints: args.constraints,
            requests: args.requests,
            special_story: args.special_story,
        }
    }
}

struct App {
    config: Config,
    records: RecordService<FileBackend>,
    gate: AuthGate,
    state: AppState,
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let coded = code_for(&error);
            if json {
                match serde_json::to_string(&coded.envelope()) {
                    Ok(line) => eprintln!("{line}"),
                    Err(_) => eprintln!("error: {coded}"),
                }
            } else {
                eprintln!("error: {error:#}");
            }
            ExitCode::from(coded.kind.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "eden_jarvis=debug,jarvis=debug" } else { "eden_jarvis=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env(cli.data_dir)?;
    debug!(data_dir = %config.data_dir.display(), model = %config.model, "configuration resolved");
    let store = Store::new(FileBackend::new(&config.data_dir));
    let records = RecordService::new(store).with_latency(config.record_latency);
    let mut app = App {
        config,
        records,
        gate: AuthGate::plaintext(),
        state: AppState::new(),
        json: cli.json,
    };

    match cli.command {
        Commands::Init => run_init(&app),
        Commands::Login(login) => {
            staff_session(&mut app, &login)?;
            app.emit(&serde_json::json!({ "ok": true, "id": login.id }), || {
                format!("{SYSTEM_NAME}: welcome, {}", login.id)
            })
        }
        Commands::Shots(command) => run_shots(&mut app, command).await,
        Commands::Staff(command) => run_staff(&mut app, command).await,
        Commands::Script(command) => run_script(&mut app, command).await,
        Commands::Scene { login, file } => {
            staff_session(&mut app, &login)?;
            let script = read_script(&file)?;
            app.state.transfer_to_scene_plan(script)?;
            run_scene_plan(&mut app).await
        }
        Commands::Economics {
            login,
            price,
            margin,
            cpm,
            ctr,
            cvr,
        } => {
            staff_session(&mut app, &login)?;
            app.state.select_tab(Tab::MetaCalculator)?;
            let inputs = AdInputs {
                price,
                margin,
                cpm,
                ctr,
                cvr,
            };
            let report = app
                .client()?
                .analyze_economics(&inputs)
                .await
                .context("ad economics analysis failed")?;
            app.emit(&report, || render_economics(&report))?;
            app.state.record_economics(report);
            Ok(())
        }
        Commands::Proposal {
            login,
            client_name,
            main_product,
            volume,
            output,
        } => {
            staff_session(&mut app, &login)?;
            app.state.select_tab(Tab::ProposalGenerator)?;
            let mut search_volume: [String; 4] = Default::default();
            for (slot, value) in search_volume.iter_mut().zip(volume) {
                *slot = value;
            }
            let inputs = ProposalInputs {
                client_name,
                main_product,
                search_volume,
            };
            let html = app
                .client()?
                .generate_proposal(&inputs)
                .await
                .context("proposal generation failed")?;
            let output = output.unwrap_or_else(default_proposal_path);
            fs::write(&output, &html)
                .with_context(|| format!("failed to write proposal {}", output.display()))?;
            app.emit(
                &serde_json::json!({ "ok": true, "output": output.display().to_string() }),
                || format!("Proposal written to {}", output.display()),
            )?;
            app.state.record_proposal(html);
            Ok(())
        }
    }
}

impl App {
    fn client(&self) -> Result<GenerationClient<GeminiTransport>> {
        let transport = GeminiTransport::new(self.config.http_client()?, &self.config.api_base);
        Ok(GenerationClient::new(transport, self.config.api_key.clone())
            .with_model(&self.config.model))
    }

    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(value).context("failed to serialize output")?
            );
        } else {
            println!("{}", human());
        }
        Ok(())
    }
}

fn staff_session(app: &mut App, login: &StaffLogin) -> Result<()> {
    app.state
        .login_staff(&app.gate, app.records.store(), &login.id, &login.pw)?;
    Ok(())
}

fn admin_session(app: &mut App, admin: &AdminLogin) -> Result<()> {
    app.state
        .login_admin(&app.gate, &admin.admin_id, &admin.admin_pw)?;
    app.state.require_admin()?;
    Ok(())
}

fn run_init(app: &App) -> Result<()> {
    let store = app.records.store();
    store.initialize()?;
    let root = store.backend().root();
    let shots = app.records.list_shots();
    let staff = app.records.list_staff();
    app.emit(
        &serde_json::json!({
            "ok": true,
            "data_dir": root.display().to_string(),
            "shots": shots.len(),
            "staff": staff.len(),
        }),
        || {
            format!(
                "Initialized {} ({} shots, {} staff)",
                root.display(),
                shots.len(),
                staff.len()
            )
        },
    )
}

async fn run_shots(app: &mut App, command: ShotsCommand) -> Result<()> {
    let shots = match command {
        ShotsCommand::List { login, category } => {
            staff_session(app, &login)?;
            let shots: Vec<ShotRecord> = app
                .records
                .list_shots()
                .into_iter()
                .filter(|shot| category.map_or(true, |category| shot.category == category))
                .collect();
            return app.emit(&shots, || render_shots(&shots));
        }
        ShotsCommand::Add {
            admin,
            id,
            category,
            name,
            action,
            description,
            link,
        } => {
            admin_session(app, &admin)?;
            let shot = ShotRecord {
                id: id.unwrap_or_else(RecordService::<FileBackend>::new_shot_id),
                category,
                name,
                action,
                description,
                link,
            };
            app.records.add_shot(shot).await?
        }
        ShotsCommand::Update {
            admin,
            id,
            category,
            name,
            action,
            description,
            link,
        } => {
            admin_session(app, &admin)?;
            let mut shot = app.records.find_shot(&id).ok_or_else(|| {
                anyhow!(CodedError::new(
                    CodedErrorKind::Records,
                    "records.not_found",
                    format!("no shot with id '{id}'")
                ))
            })?;
            if let Some(category) = category {
                shot.category = category;
            }
            if let Some(name) = name {
                shot.name = name;
            }
            if let Some(action) = action {
                shot.action = action;
            }
            if let Some(description) = description {
                shot.description = description;
            }
            if let Some(link) = link {
                shot.link = link;
            }
            app.records.update_shot(shot).await?
        }
        ShotsCommand::Delete { admin, id } => {
            admin_session(app, &admin)?;
            app.records.delete_shot(&id).await?
        }
    };
    app.emit(&shots, || format!("{} shots stored", shots.len()))
}

async fn run_staff(app: &mut App, command: StaffCommand) -> Result<()> {
    let staff = match command {
        StaffCommand::List { admin } => {
            admin_session(app, &admin)?;
            app.records.list_staff()
        }
        StaffCommand::Add { admin, id, pw } => {
            admin_session(app, &admin)?;
            app.records.add_staff(StaffAccount::new(id, pw)).await?
        }
        StaffCommand::Delete { admin, id } => {
            admin_session(app, &admin)?;
            app.records.delete_staff(&id).await?
        }
    };
    app.emit(&staff, || {
        staff
            .iter()
            .map(|account| account.id.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    })
}

async fn run_script(app: &mut App, command: ScriptCommand) -> Result<()> {
    match command {
        ScriptCommand::Generate {
            login,
            brief,
            scene_plan,
        } => {
            staff_session(app, &login)?;
            app.state.select_tab(Tab::ScriptGenerator)?;
            let brief = AdvertiserBrief::from(brief);
            let result = app
                .client()?
                .generate_script(&brief)
                .await
                .context("script generation failed")?;
            app.emit(&result, || render_script(&result))?;
            let script = result.full_script.clone();
            app.state.record_script(result);
            if scene_plan {
                app.state.transfer_to_scene_plan(script)?;
                run_scene_plan(app).await?;
            }
            Ok(())
        }
        ScriptCommand::Tune { login, file } => {
            staff_session(app, &login)?;
            app.state.select_tab(Tab::ScriptGenerator)?;
            let script = read_script(&file)?;
            let result = app
                .client()?
                .tune_script(&script)
                .await
                .context("script tuning failed")?;
            app.emit(&result, || render_script(&result))?;
            app.state.record_script(result);
            Ok(())
        }
    }
}

async fn run_scene_plan(app: &mut App) -> Result<()> {
    let script = app.state.transferred_script().unwrap_or_default().to_owned();
    let shots = app.records.list_shots();
    let plan = app
        .client()?
        .generate_scene_plan(&script, &shots)
        .await
        .context("scene plan generation failed")?;
    app.emit(&plan, || render_scene_plan(&plan))?;
    app.state.record_scene_plan(plan);
    Ok(())
}

fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read script {}", path.display()))
}

fn default_proposal_path() -> PathBuf {
    PathBuf::from(format!(
        "proposal-{}.html",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ))
}

fn render_shots(shots: &[ShotRecord]) -> String {
    shots
        .iter()
        .map(|shot| {
            format!(
                "{}\t{}\t{}\t{}",
                shot.id, shot.category, shot.name, shot.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_script(result: &ScriptResult) -> String {
    format!(
        "[{} / {}] {}자\n\n{}\n\n후킹 전략: {}\n키워드 전략: {}\n성공 포인트: {}",
        result.hook_type,
        result.flow_type,
        result.char_count,
        result.full_script,
        result.hook_strategy,
        result.keyword_strategy,
        result.success_points
    )
}

fn render_scene_plan(plan: &[ScenePlanItem]) -> String {
    let mut lines = Vec::new();
    for item in plan {
        lines.push(format!("{}. {}", item.sentence_id, item.sentence));
        for recommendation in &item.recommendations {
            lines.push(format!(
                "   - [{}] {} ({})",
                recommendation.shot_name, recommendation.description, recommendation.link
            ));
        }
    }
    lines.join("\n")
}

fn render_economics(report: &AdEconomicsReport) -> String {
    match report {
        AdEconomicsReport::Analysis(payload) => {
            let table = &payload.table_data;
            let mut lines = vec![
                format!("마진율 {}", table.margin_rate),
                format!("손익분기 ROAS {} / 최적 ROAS {}", table.end_roas, table.opt_roas),
                format!("Max CPC {} / 적정 CPC {}", table.mcvr, table.opt_cpc),
                format!("현재 ROI {}", table.current_roi),
                format!(
                    "판정: {} ({})",
                    if payload.verdict.possible { "가능" } else { "불가" },
                    payload.verdict.reason
                ),
                format!(
                    "목표: ROAS {} / CPC {} - {}",
                    payload.recommendation.target_roas,
                    payload.recommendation.target_cpc,
                    payload.recommendation.adjustment
                ),
            ];
            lines.extend(
                payload
                    .strategy
                    .action_items
                    .iter()
                    .map(|item| format!("- {item}")),
            );
            lines.join("\n")
        }
        AdEconomicsReport::Simulation(payload) => {
            let simulation = &payload.simulation;
            let mut lines = vec![
                format!("생존 ROAS {}", simulation.survival_roas),
                format!(
                    "평균 CPC {} 기준 필요 전환율 {}",
                    simulation.avg_cpc, simulation.required_cvr
                ),
            ];
            lines.extend(simulation.scenarios.iter().map(|scenario| {
                format!(
                    "CPC {}: 손익분기 CVR {} / 수익 CVR {}",
                    scenario.cpc, scenario.break_even_cvr, scenario.profitable_cvr
                )
            }));
            lines.push(simulation.advice.clone());
            lines.join("\n")
        }
    }
}
