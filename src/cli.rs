use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};

use crate::clients::caldav::CalendarBackend;
use crate::handlers::intent::{self, AddReply, ListReply, SkillContext};
use crate::models::slots::MissingSlot;
use crate::service::confirmation;
use crate::service::grammar;
use crate::service::temporal;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the slots extracted from an utterance.
    Parse { utterance: String },
    /// Resolve a time-frame phrase against the current instant.
    Resolve { phrase: String },
    /// Create a calendar event from an utterance.
    Add {
        utterance: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// List calendar events for an utterance's owner and time frame.
    List {
        utterance: String,
        #[arg(long)]
        owner: Option<String>,
    },
}

pub async fn cli(ctx: &SkillContext, backend: Option<&dyn CalendarBackend>) {
    // Fine to panic here
    let cli = Cli::parse();
    match &cli.command {
        Commands::Parse { utterance } => match grammar::parse_slots(utterance) {
            Ok(slots) => {
                println!(
                    "calendar owner: {}",
                    slots.calendar_owner.as_deref().unwrap_or("<absent>")
                );
                println!(
                    "time frame: {}",
                    slots.time_frame.as_deref().unwrap_or("<absent>")
                );
            }
            Err(e) => println!("{}", e),
        },
        Commands::Resolve { phrase } => {
            let now = Utc::now().with_timezone(&ctx.timezone());
            match temporal::resolve(phrase, now) {
                Ok(interval) => {
                    println!("{} -> {}", interval.start(), interval.end());
                    println!(
                        "{}",
                        confirmation::confirm_interval(&interval, ctx.timezone())
                    );
                }
                Err(e) => println!("{}", e),
            }
        }
        Commands::Add {
            utterance,
            name,
            owner,
        } => {
            let Some(backend) = backend else {
                println!("SERVER_URL, CALDAV_USER and CALDAV_PASSWORD must be set for calendar commands");
                return;
            };
            if let Err(e) = add_event(ctx, backend, utterance, name.as_deref(), owner.as_deref()).await
            {
                println!("Failed to create event: {}", e);
            }
        }
        Commands::List { utterance, owner } => {
            let Some(backend) = backend else {
                println!("SERVER_URL, CALDAV_USER and CALDAV_PASSWORD must be set for calendar commands");
                return;
            };
            if let Err(e) = list_events(ctx, backend, utterance, owner.as_deref()).await {
                println!("Failed to list events: {}", e);
            }
        }
    }
}

async fn add_event(
    ctx: &SkillContext,
    backend: &dyn CalendarBackend,
    utterance: &str,
    name: Option<&str>,
    owner: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now().with_timezone(&ctx.timezone());
    let mut utterance = utterance.to_string();
    let mut owner = owner.map(str::to_string);
    let event_name = match name {
        Some(n) => n.to_string(),
        None => title_case(&Text::new("What should I call the event?").prompt()?),
    };

    loop {
        match intent::handle_add_event(ctx, &utterance, owner.as_deref(), &event_name, now)? {
            AddReply::NeedSlot(MissingSlot::CalendarOwner) => {
                owner = Some(Text::new("Whose calendar should it go on?").prompt()?);
            }
            AddReply::NeedSlot(MissingSlot::TimeFrame) => {
                let frame = Text::new("For what time frame?").prompt()?;
                utterance = format!("{} {}", utterance, frame);
            }
            AddReply::Create {
                calendar,
                owner_possessive,
                event,
                confirmation,
            } => {
                let question = format!(
                    "Should I put {} on {} calendar?",
                    confirmation, owner_possessive
                );
                if !Confirm::new(&question).with_default(true).prompt()? {
                    println!("Okay, I won't create it.");
                    return Ok(());
                }
                backend.create_event(&calendar, &event).await?;
                println!("Created {} on {} calendar", confirmation, owner_possessive);
                return Ok(());
            }
        }
    }
}

async fn list_events(
    ctx: &SkillContext,
    backend: &dyn CalendarBackend,
    utterance: &str,
    owner: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now().with_timezone(&ctx.timezone());
    let mut utterance = utterance.to_string();
    let mut owner = owner.map(str::to_string);

    loop {
        match intent::handle_list_events(ctx, &utterance, owner.as_deref(), now)? {
            ListReply::NeedSlot(MissingSlot::CalendarOwner) => {
                owner = Some(Text::new("Whose calendar should I check?").prompt()?);
            }
            ListReply::NeedSlot(MissingSlot::TimeFrame) => {
                let frame = Text::new("For what time frame?").prompt()?;
                utterance = format!("{} {}", utterance, frame);
            }
            ListReply::Query { calendar, window } => {
                let events = backend.list_events(&calendar, &window).await?;
                if events.is_empty() {
                    println!(
                        "Nothing scheduled {}",
                        confirmation::confirm_interval(&window, ctx.timezone())
                    );
                    return Ok(());
                }
                for line in intent::present_events(events, ctx.timezone()) {
                    println!("{}", line);
                }
                return Ok(());
            }
        }
    }
}

/// Spoken event names arrive lower-cased; store them title-cased.
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
