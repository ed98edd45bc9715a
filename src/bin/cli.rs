use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use crew_schedule::logging::{LogLevel, init_logging};
use crew_schedule::notes::{NoteCache, PlainTextSource, match_notes_to_tasks};
use crew_schedule::timeline::{gantt_frame, write_gantt_csv};
use crew_schedule::{
    IngestOptions, ScheduleReport, SchedulerConfig, Task, parse_wide_csv_path, plan_schedule,
};
use polars::prelude::{AnyValue, DataFrame};

#[derive(Debug, Parser)]
#[command(name = "cli", about = "Crew-leveled construction scheduler")]
struct Args {
    /// Wide task sheet to load on start-up.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Scheduler configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "data/notes_cache.json")]
    notes_cache: PathBuf,
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

struct Session {
    tasks: Vec<Task>,
    sections: Vec<String>,
    config: SchedulerConfig,
    report: Option<ScheduleReport>,
    notes_cache: PathBuf,
}

impl Session {
    fn load(&mut self, path: &Path) {
        let options = IngestOptions {
            auto_chain: self.config.auto_chain,
        };
        match parse_wide_csv_path(path, &options) {
            Ok(outcome) => {
                for warning in &outcome.warnings {
                    println!("warning: {warning}");
                }
                self.sections = outcome.sections();
                self.tasks = outcome.tasks;
                self.report = None;
                println!(
                    "Loaded {} tasks in {} section(s) from {}",
                    self.tasks.len(),
                    self.sections.len(),
                    path.display()
                );
            }
            Err(err) => println!("Error: {err}"),
        }
    }

    fn compute(&mut self) {
        match plan_schedule(&self.tasks, &self.config) {
            Ok(report) => {
                println!("{}", report.to_cli_summary());
                for warning in &report.warnings {
                    println!("warning: {warning}");
                }
                self.report = Some(report);
            }
            Err(err) => println!("Error: {err}"),
        }
    }

    fn report(&self) -> Option<&ScheduleReport> {
        if self.report.is_none() {
            println!("No schedule yet; run 'compute' first");
        }
        self.report.as_ref()
    }
}

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Float64(v) => format!("{v:.1}"),
        other => other.to_string(),
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(ci) {
                *width = (*width).max(cell.len());
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, w) in widths.iter().enumerate() {
            let cell = cells.get(ci).map(String::as_str).unwrap_or("");
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(w.saturating_sub(cell.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let headers: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let rows: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
                .collect()
        })
        .collect();
    render_table(&headers, &rows)
}

fn render_tasks(tasks: &[Task]) -> String {
    let headers: Vec<String> = ["id", "section", "subsection", "name", "day", "hours", "crew", "depends on"]
        .into_iter()
        .map(String::from)
        .collect();
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.section.clone().unwrap_or_default(),
                t.subsection.clone().unwrap_or_default(),
                t.name.clone(),
                t.planned_day.to_string(),
                t.duration_hours.map(|h| format!("{h:.1}")).unwrap_or_else(|| "?".to_string()),
                t.crew_code.clone().unwrap_or_default(),
                t.dependencies
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ]
        })
        .collect();
    render_table(&headers, &rows)
}

fn print_help() {
    println!(
        "Commands:\n  help                        Show this help\n  load <csv>                  Load a wide task sheet\n  hours <n>                   Set working hours per day\n  pool <on|off>               Pool crews by category\n  cap <category> <n>          Set concurrent crews for a category\n  sections [a,b,...]          List sections, or restrict scheduling to some (no argument clears)\n  target <days|off>           Set a target duration\n  compute                     Level the schedule\n  show                        Show loaded tasks\n  gantt                       Show the leveled schedule\n  metrics                     Show project duration\n  notes <file...>             Refresh drawing notes and suggest matching tasks\n  export <path>               Write the schedule (.json report, otherwise gantt csv)\n  quit|exit                   Exit"
    );
}

fn export(session: &Session, report: &ScheduleReport, path: &str) {
    let result = if path.ends_with(".json") {
        serde_json::to_string_pretty(report)
            .map_err(|err| err.to_string())
            .and_then(|body| fs::write(path, body).map_err(|err| err.to_string()))
            .map(|_| report.task_count())
    } else {
        write_gantt_csv(&report.schedule, &session.config.work_clock(), path).map_err(|err| err.to_string())
    };
    match result {
        Ok(rows) => println!("Wrote {rows} task(s) to {path}"),
        Err(err) => println!("Error: {err}"),
    }
}

fn refresh_notes(session: &Session, files: &[&str]) {
    let mut cache = match NoteCache::load(&session.notes_cache) {
        Ok(cache) => cache,
        Err(err) => {
            println!("warning: ignoring unreadable note cache: {err}");
            NoteCache::new()
        }
    };
    if !files.is_empty() {
        match cache.refresh(files, &PlainTextSource) {
            Ok(stats) if stats.changed() => {
                if let Err(err) = cache.save(&session.notes_cache) {
                    println!("Error: {err}");
                }
            }
            Ok(_) => {}
            Err(err) => {
                println!("Error: {err}");
                return;
            }
        }
    }

    let notes = cache.all_notes();
    if notes.is_empty() {
        println!("No drawing notes");
        return;
    }
    for matched in match_notes_to_tasks(&notes, &session.tasks, 3) {
        println!("- {}", matched.note);
        for candidate in matched.matches {
            println!("    {} {} ({})", candidate.task_id, candidate.name, candidate.score);
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_level);

    let config = match &args.config {
        Some(path) => match SchedulerConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(2);
            }
        },
        None => SchedulerConfig::default(),
    };

    let mut session = Session {
        tasks: Vec::new(),
        sections: Vec::new(),
        config,
        report: None,
        notes_cache: args.notes_cache,
    };
    if let Some(path) = &args.csv {
        session.load(path);
    }

    println!("Crew Schedule (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "load" => match parts.next() {
                Some(path) => session.load(Path::new(path)),
                None => println!("Usage: load <csv>"),
            },
            "hours" => match parts.next().and_then(|v| v.parse::<f64>().ok()) {
                Some(hours) if hours.is_finite() && hours > 0.0 => {
                    session.config.hours_per_day = hours;
                    println!("Hours per day: {hours}");
                }
                _ => println!("Usage: hours <positive number>"),
            },
            "pool" => match parts.next() {
                Some("on") => {
                    session.config.pool_by_category = true;
                    println!("Crews pooled by category");
                }
                Some("off") => {
                    session.config.pool_by_category = false;
                    println!("Crews scheduled by exact code");
                }
                _ => println!("Usage: pool <on|off>"),
            },
            "cap" => {
                let category = parts.next();
                let crews = parts.next().and_then(|v| v.parse::<u32>().ok());
                match (category, crews) {
                    (Some(category), Some(crews)) => {
                        session.config.set_capacity(category, crews);
                        println!("Category {category}: {} crew(s)", crews.max(1));
                    }
                    _ => println!("Usage: cap <category> <n>"),
                }
            }
            "sections" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    session.config.sections.clear();
                    println!("Available sections: {}", session.sections.join(", "));
                    println!("Scheduling all sections");
                } else {
                    session.config.sections = rest
                        .join(" ")
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                    println!("Scheduling sections: {}", session.config.sections.join(", "));
                }
            }
            "target" => match parts.next() {
                Some("off") => {
                    session.config.target_days = None;
                    println!("Target cleared");
                }
                Some(value) => match value.parse::<f64>() {
                    Ok(days) if days.is_finite() && days > 0.0 => {
                        session.config.target_days = Some(days);
                        println!("Target: {days} day(s)");
                    }
                    _ => println!("Usage: target <days|off>"),
                },
                None => println!("Usage: target <days|off>"),
            },
            "compute" => session.compute(),
            "show" => print!("{}", render_tasks(&session.tasks)),
            "gantt" => {
                if let Some(report) = session.report() {
                    match gantt_frame(&report.schedule, &session.config.work_clock()) {
                        Ok(df) => print!("{}", render_df_as_text_table(&df)),
                        Err(err) => println!("Error: {err}"),
                    }
                }
            }
            "metrics" => {
                if let Some(report) = session.report() {
                    println!(
                        "Duration: {:.1} working day(s) ({:.1} h at {} h/day)",
                        report.metrics.duration_days, report.metrics.finish_hours, session.config.hours_per_day
                    );
                    if let Some(advice) = report.target.as_ref().and_then(|t| t.advice()) {
                        println!("{advice}");
                    }
                }
            }
            "notes" => {
                let files: Vec<&str> = parts.collect();
                refresh_notes(&session, &files);
            }
            "export" => match parts.next() {
                Some(path) => {
                    if let Some(report) = session.report() {
                        export(&session, report, path);
                    }
                }
                None => println!("Usage: export <path>"),
            },
            "quit" | "exit" => break,
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
