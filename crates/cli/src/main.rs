use std::sync::Arc;

use clap::{Parser, Subcommand};
use hms_core::{Board, ClientConfig, DataSource, HmsService, Loaded};
use hms_wire::{
    NewEmergencyAdmission, NewEmergencyBed, NewPatient, NewStaff, NonEmptyText, Priority,
    RecordId, TransferTarget,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hms")]
#[command(about = "Hospital Management System CLI")]
struct Cli {
    /// API base URL (overrides HMS_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Fall back to stub data when the backend is unreachable
    #[arg(long, global = true)]
    stub: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dashboard counts
    Dashboard,
    /// List patients
    Patients {
        /// Match against name, phone or id
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one patient
    Patient {
        /// Patient id (integer or UUID)
        id: RecordId,
    },
    /// Register a patient
    AddPatient {
        /// Full name
        name: String,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        blood_group: Option<String>,
        /// OPD, IPD, Emergency, ...
        #[arg(long)]
        patient_type: Option<String>,
    },
    /// List staff
    Staff {
        /// Only active staff with this role (e.g. Doctor, Nurse)
        #[arg(long)]
        role: Option<String>,
    },
    /// Register a staff member
    AddStaff {
        /// Full name
        name: String,
        /// Doctor, Nurse, ...
        role: String,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Emergency department
    Emergency {
        #[command(subcommand)]
        command: EmergencyCommands,
    },
    /// Intensive care unit
    Icu {
        #[command(subcommand)]
        command: UnitCommands,
    },
    /// Ward rooms
    Rooms {
        #[command(subcommand)]
        command: UnitCommands,
    },
    /// Operation theatres
    Ot {
        #[command(subcommand)]
        command: UnitCommands,
    },
}

#[derive(Subcommand)]
enum EmergencyCommands {
    /// Bed and slot occupancy
    Board,
    /// Active admissions, most urgent first
    Admissions,
    /// Admit a patient to a free bed
    Admit {
        patient_id: RecordId,
        bed_id: RecordId,
        /// Critical, High, Medium or Low
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        doctor_id: Option<RecordId>,
        #[arg(long)]
        diagnosis: Option<String>,
    },
    /// Register a new emergency bed
    AddBed {
        bed_no: String,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        bed_type: Option<String>,
        #[arg(long)]
        charges_per_day: Option<f64>,
    },
    /// Discharge an admission
    Discharge { id: RecordId },
    /// Transfer an admission to IPD, OT or ICU
    Transfer { id: RecordId, target: String },
}

#[derive(Subcommand)]
enum UnitCommands {
    /// Occupancy board
    Board,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("hms=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut cfg = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        cfg = cfg.with_base_url(base_url)?;
    }
    if cli.stub {
        cfg = cfg.with_stub_data(true);
    }
    tracing::debug!(
        base_url = %cfg.base_url(),
        stub_fallback = cfg.use_stub_data(),
        "resolved configuration"
    );
    let hms = HmsService::new(Arc::new(cfg))?;

    match cli.command {
        Some(Commands::Dashboard) => {
            let summary = hms.dashboard().summary().await?;
            note_source(summary.source);
            let s = summary.data;
            println!("Total patients:       {}", s.total_patients);
            println!("Total staff:          {}", s.total_staff);
            println!("Doctors:              {}", s.total_doctors);
            println!("Nurses:               {}", s.total_nurses);
            println!("Emergency admissions: {}", s.emergency_admissions);
            println!("Available beds:       {}", s.available_beds);
        }
        Some(Commands::Patients { search }) => {
            let patients = hms.patients().search(search.as_deref().unwrap_or("")).await?;
            note_source(patients.source);
            if patients.data.is_empty() {
                println!("No patients found.");
            }
            for p in patients.data {
                println!(
                    "ID: {}, Name: {}, Age: {}, Gender: {}, Phone: {}, Type: {}",
                    p.id, p.name, p.age, p.gender, p.phone, p.patient_type
                );
            }
        }
        Some(Commands::Patient { id }) => {
            let patient = hms.patients().get(id).await?;
            note_source(patient.source);
            let p = patient.data;
            println!("ID:          {}", p.id);
            println!("Name:        {}", p.name);
            println!("Age:         {}", p.age);
            println!("Gender:      {}", p.gender);
            println!("Phone:       {}", p.phone);
            println!("Address:     {}", p.address);
            println!("Blood group: {}", p.blood_group);
            println!("Type:        {}", p.patient_type);
            if let Some(at) = p.registered_at {
                println!("Registered:  {}", at.format("%Y-%m-%d"));
            }
            println!("Status:      {:?}", p.status);
        }
        Some(Commands::AddPatient {
            name,
            age,
            gender,
            phone,
            address,
            blood_group,
            patient_type,
        }) => {
            let mut payload = NewPatient::new(NonEmptyText::new(&name)?);
            payload.age = age;
            payload.gender = gender;
            payload.phone_no = phone;
            payload.address = address;
            payload.blood_group = blood_group;
            payload.patient_type = patient_type;

            match hms.patients().create(&payload).await? {
                Some(p) => println!("Registered patient {} with ID: {}", p.name, p.id),
                None => println!("Registered patient {name}"),
            }
        }
        Some(Commands::Staff { role }) => {
            let staff = match role.as_deref() {
                Some(role) => hms.staff().with_role(role).await?,
                None => hms.staff().list().await?,
            };
            note_source(staff.source);
            if staff.data.is_empty() {
                println!("No staff found.");
            }
            for s in staff.data {
                println!(
                    "ID: {}, Name: {}, Role: {}, Department: {}",
                    s.id, s.name, s.role, s.department
                );
            }
        }
        Some(Commands::AddStaff {
            name,
            role,
            department,
            phone,
            email,
        }) => {
            let mut payload = NewStaff::new(NonEmptyText::new(&name)?, NonEmptyText::new(&role)?);
            payload.department_name = department;
            payload.phone_no = phone;
            payload.email = email;

            match hms.staff().create(&payload).await? {
                Some(s) => println!("Registered {} {} with ID: {}", s.role, s.name, s.id),
                None => println!("Registered {role} {name}"),
            }
        }
        Some(Commands::Emergency { command }) => emergency(&hms, command).await?,
        Some(Commands::Icu {
            command: UnitCommands::Board,
        }) => {
            let board = hms.icu().board().await?;
            print_board("ICU beds", board, |b| format!("{} ({})", b.bed_no, b.icu_type));
        }
        Some(Commands::Rooms {
            command: UnitCommands::Board,
        }) => {
            let board = hms.rooms().board().await?;
            print_board("Room beds", board, |b| {
                format!("{} / {} ({})", b.room_no, b.bed_no, b.category)
            });
        }
        Some(Commands::Ot {
            command: UnitCommands::Board,
        }) => {
            let board = hms.theatres().board().await?;
            print_board("Operation theatres", board, |t| {
                format!("{} ({})", t.name, t.ot_type)
            });
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

async fn emergency(hms: &HmsService, command: EmergencyCommands) -> anyhow::Result<()> {
    let emergency = hms.emergency();
    match command {
        EmergencyCommands::Board => {
            let board = emergency.board().await?;
            let source = board.source;
            print_board(
                "Emergency beds",
                Loaded {
                    data: board.data.beds,
                    source,
                },
                |b| format!("{} ({})", b.bed_no, b.room_no),
            );
            println!();
            print_board(
                "Emergency bed slots",
                Loaded {
                    data: board.data.slots,
                    source,
                },
                |s| format!("{} {}-{}", s.slot_no, s.start_time, s.end_time),
            );
        }
        EmergencyCommands::Admissions => {
            let queue = emergency.active_admissions().await?;
            note_source(queue.source);
            if queue.data.is_empty() {
                println!("No active emergency admissions.");
            }
            for a in queue.data {
                let admitted = a
                    .admitted_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "[{}] ID: {}, Patient: {}, Bed: {}, Admitted: {}, Status: {}",
                    a.priority,
                    a.id,
                    a.patient_name,
                    a.bed_id.map(|b| b.to_string()).unwrap_or_else(|| "-".into()),
                    admitted,
                    a.lifecycle.to_wire()
                );
            }
        }
        EmergencyCommands::Admit {
            patient_id,
            bed_id,
            priority,
            doctor_id,
            diagnosis,
        } => {
            let priority = priority
                .as_deref()
                .map(Priority::from_wire)
                .unwrap_or_default();
            let mut payload = NewEmergencyAdmission::new(patient_id, bed_id, priority);
            payload.doctor_id = doctor_id;
            payload.diagnosis = diagnosis;

            match emergency.admit(&payload).await? {
                Some(a) => println!("Admitted patient {patient_id} to bed {bed_id} (admission {})", a.id),
                None => println!("Admitted patient {patient_id} to bed {bed_id}"),
            }
        }
        EmergencyCommands::AddBed {
            bed_no,
            room,
            bed_type,
            charges_per_day,
        } => {
            let mut payload = NewEmergencyBed::new(NonEmptyText::new(&bed_no)?);
            payload.emergency_room_name_no = room;
            payload.bed_type = bed_type;
            payload.charges_per_day = charges_per_day;

            match emergency.beds.create(&payload).await? {
                Some(b) => println!("Added emergency bed {} with ID: {}", b.bed_no, b.id),
                None => println!("Added emergency bed {bed_no}"),
            }
        }
        EmergencyCommands::Discharge { id } => {
            emergency.discharge(id).await?;
            println!("Discharged emergency admission {id}");
        }
        EmergencyCommands::Transfer { id, target } => {
            let Some(to) = TransferTarget::from_wire(&target) else {
                anyhow::bail!("unknown transfer target {target:?}; expected IPD, OT or ICU");
            };
            emergency.transfer(id, to).await?;
            println!("Transferred emergency admission {id} to {target}");
        }
    }
    Ok(())
}

fn note_source(source: DataSource) {
    if source == DataSource::Stub {
        eprintln!("(backend unavailable: showing stub data)");
    }
}

fn print_board<U>(title: &str, board: Loaded<Board<U>>, label: impl Fn(&U) -> String) {
    note_source(board.source);
    let Board { units, summary } = board.data;
    println!(
        "{title}: {} total, {} occupied, {} available",
        summary.total, summary.occupied, summary.available
    );
    for u in units {
        let state = if u.occupied {
            let by: Vec<String> = u.occupied_by.iter().map(|id| id.to_string()).collect();
            format!("occupied by admission {}", by.join(", "))
        } else {
            "free".to_owned()
        };
        println!("  {:<32} {state}", label(&u.unit));
    }
}
