use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    ActionOutcome, FixedGroupContext, HttpSupplierService, SaveOutcome, StoreOptions,
    SupplierField, SupplierForm, SupplierListController, SupplierStore,
};
use shared::domain::{ConsumerGroupId, Supplier, SupplierId};
use tracing::info;

mod config;
mod console;

use config::load_settings;
use console::{ConsoleNotifier, PrintNavigator, TerminalConfirmation};

#[derive(Parser, Debug)]
#[command(about = "Manage the suppliers of a buying group")]
struct Cli {
    /// Supplier service base url; overrides the settings file.
    #[arg(long)]
    api_url: Option<String>,
    /// Active buying group; overrides the settings file.
    #[arg(long)]
    group: Option<i64>,
    /// Accept confirmation prompts without asking.
    #[arg(long, short = 'y', global = true)]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        show_inactive: bool,
        #[arg(long)]
        json: bool,
    },
    Create {
        #[command(flatten)]
        fields: FieldArgs,
    },
    Update {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    Toggle {
        id: i64,
    },
    Delete {
        id: i64,
    },
    Periods {
        id: i64,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    tax_id: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    bank_account: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl FieldArgs {
    /// Only flags that were given change the form.
    fn apply(self, form: &mut SupplierForm) {
        for (field, value) in [
            (SupplierField::Name, self.name),
            (SupplierField::TaxId, self.tax_id),
            (SupplierField::Email, self.email),
            (SupplierField::Phone, self.phone),
            (SupplierField::City, self.city),
            (SupplierField::Address, self.address),
            (SupplierField::PostalCode, self.postal_code),
            (SupplierField::BankAccount, self.bank_account),
            (SupplierField::Notes, self.notes),
        ] {
            if let Some(value) = value {
                form.set(field, value);
                form.touch(field);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(group) = cli.group {
        settings.consumer_group_id = Some(group);
    }
    info!(api_url = %settings.api_url, group = ?settings.consumer_group_id, "starting supplier console");

    let service = HttpSupplierService::with_timeout(&settings.api_url, settings.request_timeout())?;
    let groups = Arc::new(FixedGroupContext::new(
        settings.consumer_group_id.map(ConsumerGroupId),
    ));
    let store = SupplierStore::with_options(
        Arc::new(service),
        groups.clone(),
        StoreOptions {
            cache_ttl: settings.cache_ttl(),
        },
    );
    let mut controller = SupplierListController::new(
        store,
        groups,
        Arc::new(ConsoleNotifier),
        Arc::new(TerminalConfirmation::new(cli.yes)),
        Arc::new(PrintNavigator),
    );
    controller.initialize().await;

    run(&mut controller, cli.command).await
}

async fn run(controller: &mut SupplierListController, command: Command) -> Result<()> {
    match command {
        Command::List {
            search,
            show_inactive,
            json,
        } => {
            controller.on_search(search);
            if show_inactive {
                controller.toggle_show_inactive();
            }
            let suppliers = controller.filtered_suppliers().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&suppliers)?);
            } else {
                for supplier in &suppliers {
                    println!("{}", format_row(supplier));
                }
            }
            Ok(())
        }
        Command::Create { fields } => {
            controller.open_create_dialog();
            if let Some(form) = controller.form_mut() {
                fields.apply(form);
            }
            finish_save(controller.submit_form().await)
        }
        Command::Update { id, fields } => {
            let supplier = find(controller, id).await?;
            controller.open_edit_dialog(&supplier);
            if let Some(form) = controller.form_mut() {
                fields.apply(form);
            }
            finish_save(controller.submit_form().await)
        }
        Command::Toggle { id } => {
            let supplier = find(controller, id).await?;
            finish_action(controller.confirm_toggle_active(&supplier).await)
        }
        Command::Delete { id } => {
            let supplier = find(controller, id).await?;
            finish_action(controller.confirm_delete(&supplier).await)
        }
        Command::Periods { id } => {
            let supplier = find(controller, id).await?;
            controller.open_periods(&supplier);
            Ok(())
        }
    }
}

async fn find(controller: &SupplierListController, id: i64) -> Result<Supplier> {
    controller
        .store()
        .get(SupplierId(id))
        .await
        .ok_or_else(|| anyhow!("supplier {id} is not in the loaded list"))
}

fn finish_save(outcome: SaveOutcome) -> Result<()> {
    match outcome {
        SaveOutcome::Saved(supplier) => {
            println!("{}", format_row(&supplier));
            Ok(())
        }
        SaveOutcome::Invalid(errors) => {
            for (field, err) in &errors {
                eprintln!("  {}: {err}", field.as_str());
            }
            bail!("supplier form has {} invalid field(s)", errors.len())
        }
        SaveOutcome::Failed => bail!("supplier was not saved"),
    }
}

fn finish_action(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Done | ActionOutcome::Cancelled => Ok(()),
        ActionOutcome::Failed => bail!("supplier action failed"),
    }
}

fn format_row(supplier: &Supplier) -> String {
    let fields = &supplier.fields;
    format!(
        "{:>6}  {:<8}  {:<32}  {:<12}  {}",
        supplier.id,
        if supplier.is_active { "active" } else { "inactive" },
        fields.name,
        fields.tax_id.as_deref().unwrap_or("-"),
        fields.city.as_deref().unwrap_or("-"),
    )
}
