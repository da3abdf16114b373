//! taskdeck CLI
//!
//! Command-line interface for the task-management API:
//! - Log in, register, log out
//! - List, add, edit, complete and delete tasks
//! - Manage the account profile and password
//! - Administer tenants and subscriptions

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdeck::{
    ClientError, Config, CreateTenant, Credentials, NewTask, PasswordChange, Priority,
    ProfileUpdate, RegisterInput, Status, SubscriptionTier, Task, TaskClient, TaskFilter, Tenant,
    UserProfile,
};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for a multi-tenant task-management API")]
#[command(
    long_about = "taskdeck talks to a task-management REST service.\nSessions persist across invocations; log in once, then manage your tasks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides configuration)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        password: String,
    },

    /// Register a new account
    Register {
        /// Full name
        name: String,
        email: String,
        password: String,
        /// Password confirmation (checked before any request)
        confirm_password: String,
        /// Optional username
        #[arg(long)]
        username: Option<String>,
        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },

    /// Log out and clear the stored session
    Logout,

    /// List tasks
    List {
        /// Only tasks past their due date and not completed
        #[arg(long)]
        overdue: bool,
    },

    /// Add a task
    Add {
        title: String,
        /// Task description
        #[arg(short, long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
        /// Priority (LOW, MEDIUM, HIGH)
        #[arg(short, long, default_value = "MEDIUM")]
        priority: String,
        /// Attachment image URL
        #[arg(long)]
        image_url: Option<String>,
    },

    /// Edit fields of a task
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
        /// Priority (LOW, MEDIUM, HIGH)
        #[arg(long)]
        priority: Option<String>,
        /// Status (NOT_STARTED, IN_PROGRESS, COMPLETED)
        #[arg(long)]
        status: Option<String>,
    },

    /// Move a task to IN_PROGRESS
    Start { id: u64 },

    /// Mark a task completed
    Complete { id: u64 },

    /// Delete a task
    Delete { id: u64 },

    /// Show the status breakdown of the task list
    Stats,

    /// Account profile operations
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Tenant administration (admin accounts only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the current profile
    Show,

    /// Update profile fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        contact_number: Option<String>,
        #[arg(long)]
        position: Option<String>,
    },

    /// Change the account password
    Password {
        current: String,
        new: String,
        confirm: String,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Check whether the current session has admin rights
    Status,

    /// List tenant accounts
    Tenants,

    /// Provision a tenant account
    Create {
        email: String,
        password: String,
        name: String,
        /// Subscription tier (FREE, BASIC, PREMIUM, ENTERPRISE)
        #[arg(long, default_value = "FREE")]
        tier: String,
    },

    /// Change a tenant's subscription tier
    Subscription { id: u64, tier: String },

    /// Delete a tenant account
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);

    let base_url = config.api.base_url.clone();
    if let Err(err) = run(cli, config).await {
        match err.downcast_ref::<ClientError>() {
            Some(client_err) => eprintln!("{}", friendly_message(client_err, &base_url)),
            None => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("taskdeck={}", config.logging.level));

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter));

    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    // The config command needs no client or session
    if let Commands::Config { output } = &cli.command {
        let content = taskdeck::config::generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut client = TaskClient::from_config(&config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let session = client.login(&Credentials { email, password }).await?;
            match &session.user {
                Some(user) => println!("Logged in as {} <{}>", user.name, user.email),
                None => println!("Logged in"),
            }
        }

        Commands::Register {
            name,
            email,
            password,
            confirm_password,
            username,
            accept_terms,
        } => {
            let input = RegisterInput {
                name,
                username,
                email,
                password,
                confirm_password,
                accepted_terms: accept_terms,
            };
            let session = client.register(&input).await?;
            match &session.user {
                Some(user) => println!("Registered and logged in as {}", user.email),
                None => println!("Registered and logged in"),
            }
        }

        Commands::Logout => {
            client.logout()?;
            println!("Logged out");
        }

        Commands::List { overdue } => {
            let filter = if overdue {
                TaskFilter::Overdue
            } else {
                TaskFilter::All
            };
            let tasks = client.list_tasks(filter).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(tasks)?);
            } else {
                print_task_table(tasks);
            }
        }

        Commands::Add {
            title,
            description,
            due,
            priority,
            image_url,
        } => {
            let input = NewTask {
                title,
                description,
                due_date: due.as_deref().map(parse_due_date).transpose()?,
                priority: parse_enum::<Priority>(&priority)?,
                status: Status::NotStarted,
                image_url,
            };
            let created = client.create_task(&input).await?;
            println!("Added task {} ({})", created.id, created.title);
        }

        Commands::Edit {
            id,
            title,
            description,
            due,
            priority,
            status,
        } => {
            client.list_tasks(TaskFilter::All).await?;
            let mut task = client
                .tasks()
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no task with id {}", id))?;

            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = Some(description);
            }
            if let Some(due) = due {
                task.due_date = Some(parse_due_date(&due)?);
            }
            if let Some(priority) = priority {
                task.priority = parse_enum::<Priority>(&priority)?;
            }
            if let Some(status) = status {
                task.status = parse_enum::<Status>(&status)?;
            }

            let updated = client.update_task(&task).await?;
            println!("Updated task {} ({})", updated.id, updated.status);
        }

        Commands::Start { id } => {
            client.list_tasks(TaskFilter::All).await?;
            let task = client.start_task(id).await?;
            println!("Started task {} ({})", task.id, task.title);
        }

        Commands::Complete { id } => {
            let task = client.complete_task(id).await?;
            println!("Completed task {} ({})", task.id, task.title);
        }

        Commands::Delete { id } => {
            client.delete_task(id).await?;
            println!("Deleted task {}", id);
        }

        Commands::Stats => {
            client.list_tasks(TaskFilter::All).await?;
            let stats = client.tasks().stats();

            println!("Tasks: {}", stats.total);
            println!("  Completed:   {:>3}%", stats.completed_pct);
            println!("  In progress: {:>3}%", stats.in_progress_pct);
            println!("  Not started: {:>3}%", stats.not_started_pct);
        }

        Commands::Profile { command } => match command {
            ProfileCommands::Show => {
                let profile = client.fetch_profile().await?;
                if cli.format == "json" {
                    println!("{}", serde_json::to_string_pretty(&profile)?);
                } else {
                    print_profile(&profile);
                }
            }

            ProfileCommands::Update {
                name,
                email,
                contact_number,
                position,
            } => {
                // Unspecified fields keep their current server-side values
                let current = client.fetch_profile().await?;
                let update = ProfileUpdate {
                    name: name.unwrap_or(current.name),
                    email: email.unwrap_or(current.email),
                    contact_number: contact_number.or(current.contact_number),
                    position: position.or(current.position),
                };
                let profile = client.update_profile(&update).await?;
                println!("Profile updated for {}", profile.email);
            }

            ProfileCommands::Password {
                current,
                new,
                confirm,
            } => {
                client
                    .change_password(&PasswordChange {
                        current_password: current,
                        new_password: new,
                        confirm_password: confirm,
                    })
                    .await?;
                println!("Password changed");
            }
        },

        Commands::Admin { command } => match command {
            AdminCommands::Status => {
                if client.check_admin_status().await {
                    println!("Admin access: yes");
                } else {
                    println!("Admin access: no");
                }
            }

            AdminCommands::Tenants => {
                let tenants = client.list_tenants().await?;
                if cli.format == "json" {
                    println!("{}", serde_json::to_string_pretty(&tenants)?);
                } else {
                    print_tenant_table(&tenants);
                }
            }

            AdminCommands::Create {
                email,
                password,
                name,
                tier,
            } => {
                let tenant = client
                    .create_tenant(&CreateTenant {
                        email,
                        password,
                        name,
                        subscription_tier: parse_enum::<SubscriptionTier>(&tier)?,
                    })
                    .await?;
                println!(
                    "Created tenant {} ({}, {})",
                    tenant.id, tenant.email, tenant.subscription_tier
                );
            }

            AdminCommands::Subscription { id, tier } => {
                let tenant = client
                    .update_subscription(id, parse_enum::<SubscriptionTier>(&tier)?)
                    .await?;
                println!(
                    "Tenant {} is now on {}",
                    tenant.id, tenant.subscription_tier
                );
            }

            AdminCommands::Delete { id } => {
                client.delete_tenant(id).await?;
                println!("Deleted tenant {}", id);
            }
        },

        Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn parse_enum<T>(s: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    s.parse::<T>().map_err(|e| anyhow::anyhow!(e))
}

fn parse_due_date(s: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid due date: {}. Use YYYY-MM-DD or RFC 3339", s))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("invalid due date")?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}

fn friendly_message(err: &ClientError, base_url: &str) -> String {
    match err {
        ClientError::Validation(msg) => msg.clone(),
        ClientError::InvalidCredentials => "Invalid email or password".to_string(),
        ClientError::NotAuthenticated => {
            "Not logged in. Run: taskdeck login <email> <password>".to_string()
        }
        ClientError::Forbidden => {
            "Access denied; the stored session has been cleared. Please log in again.".to_string()
        }
        ClientError::Timeout | ClientError::Unavailable => {
            format!("Cannot reach the task API at {}", base_url)
        }
        other => format!("Request failed: {}", other),
    }
}

fn print_task_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        println!();
        println!("Add your first task with:");
        println!("  taskdeck add \"Buy milk\"");
        return;
    }

    println!(
        "{:<6} {:<30} {:<10} {:<13} {:<12} {}",
        "ID", "Title", "Priority", "Status", "Due", "Overdue"
    );
    println!("{}", "-".repeat(80));

    for task in tasks {
        let due = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let overdue = if task.is_overdue(Utc::now()) { "yes" } else { "" };

        println!(
            "{:<6} {:<30} {:<10} {:<13} {:<12} {}",
            task.id,
            truncate(&task.title, 30),
            task.priority,
            task.status,
            due,
            overdue
        );
    }
}

fn print_tenant_table(tenants: &[Tenant]) {
    if tenants.is_empty() {
        println!("No tenants.");
        return;
    }

    println!(
        "{:<6} {:<28} {:<20} {:<12} {}",
        "ID", "Email", "Name", "Tier", "Status"
    );
    println!("{}", "-".repeat(76));

    for tenant in tenants {
        println!(
            "{:<6} {:<28} {:<20} {:<12} {}",
            tenant.id,
            truncate(&tenant.email, 28),
            truncate(&tenant.name, 20),
            tenant.subscription_tier,
            if tenant.active { "Active" } else { "Inactive" }
        );
    }
}

fn print_profile(profile: &UserProfile) {
    println!("Name:     {}", profile.name);
    println!("Email:    {}", profile.email);
    if let Some(contact) = &profile.contact_number {
        println!("Contact:  {}", contact);
    }
    if let Some(position) = &profile.position {
        println!("Position: {}", position);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
