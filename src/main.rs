//! Salon CLI
//!
//! Command-line front end for the salon API:
//! - Manage employees, service types and rendered services
//! - Income, profit and payout reports
//! - Print a default config file

use anyhow::anyhow;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use salon::api::dto::ServiceQuery;
use salon::client::display::{format_date, format_money, format_percentage, MarginTone};
use salon::client::forms::{EmployeeForm, FormErrors, ReportFilterForm, ServiceForm, ServiceTypeForm};
use salon::client::views::EMPTY_PAYOUT_MESSAGE;
use salon::client::{
    EmployeeStore, IncomeView, PayoutView, ProfitView, SalonClient, ServiceStore,
    ServiceTypeStore, ViewError,
};
use salon::config::{generate_default_config, init_tracing, Config};
use salon::domain::ServiceFilter;

#[derive(Parser)]
#[command(name = "salon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gestión de salón de peluquería")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL including /api (default: config or SALON_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Employees
    Empleados {
        #[command(subcommand)]
        action: EmployeeCommand,
    },

    /// Service types
    Tipos {
        #[command(subcommand)]
        action: ServiceTypeCommand,
    },

    /// Rendered services
    Servicios {
        #[command(subcommand)]
        action: ServiceCommand,
    },

    /// Financial reports
    Reportes {
        #[command(subcommand)]
        action: ReportCommand,
    },

    /// Show API status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum EmployeeCommand {
    /// List employees sorted by name
    List,
    /// Create an employee
    Crear { id: String, nombre: String },
    /// Rename an employee
    Editar { id: String, nombre: String },
    /// Delete an employee
    Eliminar { id: String },
}

#[derive(Subcommand)]
pub enum ServiceTypeCommand {
    /// List service types sorted by name
    List,
    /// Create a service type
    Crear {
        nombre: String,
        descripcion: String,
        /// Commission percentage (0-100)
        #[arg(short, long)]
        porcentaje: String,
        /// Default price
        #[arg(long)]
        precio: Option<String>,
    },
    /// Update a service type; omitted fields keep their value
    Editar {
        nombre: String,
        #[arg(short, long)]
        descripcion: Option<String>,
        #[arg(short, long)]
        porcentaje: Option<String>,
        #[arg(long)]
        precio: Option<String>,
    },
    /// Delete a service type
    Eliminar { nombre: String },
}

#[derive(Subcommand)]
pub enum ServiceCommand {
    /// List services, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Register a service
    Registrar {
        /// Employee ID
        #[arg(short, long)]
        empleado: String,
        /// Service type name
        #[arg(short, long)]
        tipo: String,
        /// Price (default: the type's default price)
        #[arg(short, long)]
        precio: Option<String>,
        /// Date YYYY-MM-DD (default: today)
        #[arg(long)]
        fecha: Option<String>,
    },
    /// Delete a service
    Eliminar { id: String },
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Total income
    Ingresos {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Income, commissions and profit
    Beneficios {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Commissions owed to an employee
    Pago {
        /// Employee ID
        empleado: String,
        /// Start date YYYY-MM-DD
        #[arg(long)]
        desde: Option<String>,
        /// End date YYYY-MM-DD
        #[arg(long)]
        hasta: Option<String>,
    },
}

#[derive(clap::Args)]
pub struct FilterArgs {
    /// Employee ID
    #[arg(short, long)]
    empleado: Option<String>,
    /// Start date YYYY-MM-DD
    #[arg(long)]
    desde: Option<String>,
    /// End date YYYY-MM-DD
    #[arg(long)]
    hasta: Option<String>,
}

impl FilterArgs {
    fn form(self) -> ReportFilterForm {
        ReportFilterForm {
            fecha_inicio: self.desde.unwrap_or_default(),
            fecha_fin: self.hasta.unwrap_or_default(),
            empleado_id: self.empleado.unwrap_or_default(),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let (config, source) = Config::load_default();

    let directives = if cli.verbose { "salon=debug" } else { "salon=off" };
    init_tracing(&config.logging, directives);
    source.log();
    if !cli.verbose {
        for failure in &source.failures {
            eprintln!("Aviso: configuración ignorada: {}", failure);
        }
    }

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    if let Some(url) = cli.api_url {
        config.client.api_url = url;
    }
    let format = cli.format;
    let client = Arc::new(SalonClient::from_config(&config.client)?);

    match cli.command {
        Commands::Empleados { action } => employees(client, action, format).await,
        Commands::Tipos { action } => service_types(client, action, format).await,
        Commands::Servicios { action } => services(client, action, format).await,
        Commands::Reportes { action } => reports(client, action, format).await,
        Commands::Status => {
            let health = client.health().await?;
            println!("Salon API v{}", health.version);
            println!("Status: {}", health.status);
            println!("Database: {}", health.database);
            println!("Uptime: {}s", health.uptime_seconds);
            Ok(())
        }
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
            Ok(())
        }
    }
}

// ============================================
// COMMANDS
// ============================================

async fn employees(
    client: Arc<SalonClient>,
    action: EmployeeCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut store = EmployeeStore::new(client);

    match action {
        EmployeeCommand::List => {
            store.load().await?;
            let rows: Vec<Vec<String>> = store
                .sorted()
                .into_iter()
                .map(|e| vec![e.id.clone(), e.nombre.clone()])
                .collect();
            output(format, &store.sorted(), &["ID", "Nombre"], &rows, "No hay empleados registrados")
        }
        EmployeeCommand::Crear { id, nombre } => {
            let mut form = EmployeeForm::default();
            form.id = id;
            form.nombre = nombre;
            let req = form.to_create().map_err(form_error)?;
            let employee = store.create(&req).await?;
            println!("Empleado {} creado: {}", employee.id, employee.nombre);
            Ok(())
        }
        EmployeeCommand::Editar { id, nombre } => {
            let mut form = EmployeeForm::default();
            form.id = id.clone();
            form.nombre = nombre;
            let req = form.to_update().map_err(form_error)?;
            let employee = store.update(&id, &req).await?;
            println!("Empleado {} actualizado: {}", employee.id, employee.nombre);
            Ok(())
        }
        EmployeeCommand::Eliminar { id } => {
            store.remove(&id).await?;
            println!("Empleado {} eliminado", id);
            Ok(())
        }
    }
}

async fn service_types(
    client: Arc<SalonClient>,
    action: ServiceTypeCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut store = ServiceTypeStore::new(Arc::clone(&client));

    match action {
        ServiceTypeCommand::List => {
            store.load().await?;
            let rows: Vec<Vec<String>> = store
                .sorted()
                .into_iter()
                .map(|t| {
                    vec![
                        t.nombre.clone(),
                        t.descripcion.clone(),
                        format_percentage(t.porcentaje_comision),
                        t.precio_por_defecto.map(format_money).unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            output(
                format,
                &store.sorted(),
                &["Nombre", "Descripción", "Comisión", "Precio"],
                &rows,
                "No hay tipos de servicios registrados",
            )
        }
        ServiceTypeCommand::Crear {
            nombre,
            descripcion,
            porcentaje,
            precio,
        } => {
            let mut form = ServiceTypeForm::default();
            form.nombre = nombre;
            form.descripcion = descripcion;
            form.porcentaje_comision = porcentaje;
            form.precio_por_defecto = precio.unwrap_or_default();
            let req = form.to_create().map_err(form_error)?;
            let created = store.create(&req).await?;
            println!(
                "Tipo de servicio {} creado ({})",
                created.nombre,
                format_percentage(created.porcentaje_comision)
            );
            Ok(())
        }
        ServiceTypeCommand::Editar {
            nombre,
            descripcion,
            porcentaje,
            precio,
        } => {
            let current = client.get_service_type(&nombre).await?;
            let mut form = ServiceTypeForm::edit(&current);
            if let Some(descripcion) = descripcion {
                form.descripcion = descripcion;
            }
            if let Some(porcentaje) = porcentaje {
                form.porcentaje_comision = porcentaje;
            }
            if let Some(precio) = precio {
                form.precio_por_defecto = precio;
            }
            let req = form.to_update().map_err(form_error)?;
            let updated = store.update(&nombre, &req).await?;
            println!("Tipo de servicio {} actualizado", updated.nombre);
            Ok(())
        }
        ServiceTypeCommand::Eliminar { nombre } => {
            store.remove(&nombre).await?;
            println!("Tipo de servicio {} eliminado", nombre);
            Ok(())
        }
    }
}

async fn services(
    client: Arc<SalonClient>,
    action: ServiceCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut store = ServiceStore::new(Arc::clone(&client));

    match action {
        ServiceCommand::List { filter } => {
            let form = filter.form();
            let range = form.to_range().map_err(form_error)?;
            let query = ServiceQuery {
                empleado_id: form.employee().map(str::to_string),
                fecha_inicio: range.start,
                fecha_fin: range.end,
            };
            store.load(&query).await?;

            let mut scope = ServiceFilter::new().range(range);
            if let Some(id) = form.employee() {
                scope = scope.employee(id);
            }
            let services = store.filtered(&scope);
            let rows: Vec<Vec<String>> = services
                .iter()
                .map(|s| {
                    vec![
                        format_date(s.fecha),
                        s.empleado_id.clone(),
                        s.tipo_servicio.clone(),
                        format_money(s.precio),
                        format_money(s.comision_calculada),
                        s.id.clone(),
                    ]
                })
                .collect();
            output(
                format,
                &services,
                &["Fecha", "Empleado", "Tipo", "Precio", "Comisión", "ID"],
                &rows,
                "No hay servicios registrados",
            )
        }
        ServiceCommand::Registrar {
            empleado,
            tipo,
            precio,
            fecha,
        } => {
            let mut form = ServiceForm::default();
            form.empleado_id = empleado;
            if let Some(fecha) = fecha {
                form.fecha = fecha;
            }

            let mut types = ServiceTypeStore::new(client);
            types.load().await?;
            match types.find(&tipo) {
                Some(service_type) => form.select_type(service_type),
                None => form.tipo_servicio = tipo,
            }
            if let Some(precio) = precio {
                form.precio = precio;
            }

            let req = form.to_request().map_err(form_error)?;
            let service = store.register(&req).await?;
            println!(
                "Servicio registrado {} ({} {}, comisión {})",
                service.id,
                service.tipo_servicio,
                format_money(service.precio),
                format_money(service.comision_calculada)
            );
            Ok(())
        }
        ServiceCommand::Eliminar { id } => {
            store.remove(&id).await?;
            println!("Servicio {} eliminado", id);
            Ok(())
        }
    }
}

async fn reports(
    client: Arc<SalonClient>,
    action: ReportCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        ReportCommand::Ingresos { filter } => {
            let mut view = IncomeView::new(client);
            view.filter = filter.form();
            view.apply().await.map_err(view_error)?;

            if let Some(report) = view.report() {
                if format == OutputFormat::Table {
                    println!("Período: {}", view.period().unwrap_or_default());
                    println!("Ingresos totales: {}", view.total_label().unwrap_or_default());
                } else {
                    print_record(format, report)?;
                }
            }
            Ok(())
        }
        ReportCommand::Beneficios { filter } => {
            let mut view = ProfitView::new(client);
            view.filter = filter.form();
            view.apply().await.map_err(view_error)?;

            if let Some(report) = view.report() {
                if format == OutputFormat::Table {
                    let margin = view.margin().unwrap_or(0);
                    let tone = view.tone().unwrap_or(MarginTone::Low);
                    println!("Período: {}", view.period().unwrap_or_default());
                    println!("{:<22} {}", "Ingresos totales:", format_money(report.ingresos));
                    println!("{:<22} {}", "Comisiones pagadas:", format_money(report.comisiones));
                    println!("{:<22} {}", "Beneficio neto:", format_money(report.beneficios));
                    println!("{:<22} {}% ({})", "Margen de beneficio:", margin, tone.as_str());
                } else {
                    print_record(format, report)?;
                }
            }
            Ok(())
        }
        ReportCommand::Pago {
            empleado,
            desde,
            hasta,
        } => {
            let mut view = PayoutView::new(client);
            view.filter = ReportFilterForm {
                fecha_inicio: desde.unwrap_or_default(),
                fecha_fin: hasta.unwrap_or_default(),
                empleado_id: empleado,
            };
            view.apply().await.map_err(view_error)?;

            let Some(report) = view.report() else {
                return Ok(());
            };

            if format == OutputFormat::Table {
                println!("{} ({})", report.empleado_nombre, report.empleado_id);
                println!();
            }

            let rows: Vec<Vec<String>> = view
                .rows()
                .into_iter()
                .map(|r| vec![r.fecha, r.tipo_servicio, r.precio, r.comision])
                .collect();
            output(
                format,
                &report.servicios,
                &["Fecha", "Tipo", "Precio", "Comisión"],
                &rows,
                EMPTY_PAYOUT_MESSAGE,
            )?;

            if format == OutputFormat::Table {
                println!();
                println!("Total a pagar: {}", view.total_label().unwrap_or_default());
            }
            Ok(())
        }
    }
}

// ============================================
// OUTPUT
// ============================================

fn form_error(errors: FormErrors) -> anyhow::Error {
    let messages: Vec<&str> = errors.values().map(String::as_str).collect();
    anyhow!(messages.join("; "))
}

fn view_error(err: ViewError) -> anyhow::Error {
    match err {
        ViewError::Invalid(errors) => form_error(errors),
        ViewError::Client(e) => e.into(),
    }
}

/// Print a list in the chosen format
fn output<T: Serialize>(
    format: OutputFormat,
    records: &[T],
    headers: &[&str],
    rows: &[Vec<String>],
    empty_message: &str,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(headers)?;
            for row in rows {
                writer.write_record(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", empty_message);
            } else {
                print_table(headers, rows);
            }
        }
    }
    Ok(())
}

/// Print a single report record
fn print_record<T: Serialize>(format: OutputFormat, record: &T) -> anyhow::Result<()> {
    let value = serde_json::to_value(record)?;
    match (format, value.as_object()) {
        (OutputFormat::Csv, Some(fields)) => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(fields.keys())?;
            writer.write_record(fields.values().map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            }))?;
            writer.flush()?;
        }
        _ => println!("{}", serde_json::to_string_pretty(&value)?),
    }
    Ok(())
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(headers.to_vec()));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}
