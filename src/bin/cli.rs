use chrono::{NaiveDate, Weekday};
use course_planner::calendar::{self, ExclusionSet};
use course_planner::export::{self, table};
use course_planner::{AppConfig, PlanOutcome, PlanRequest, WeeklyPlan, logging};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};

/// Days and hours pre-filled whenever a course is selected, kept only where the course allows them.
const SEEDED_PLAN: [(Weekday, f64); 2] = [(Weekday::Mon, 3.0), (Weekday::Thu, 3.0)];

/// Everything the user has entered so far; rebuilt into a fresh request on every `generate`.
struct FormState {
    config: AppConfig,
    program: Option<String>,
    course: Option<String>,
    start_date: Option<String>,
    start_time: Option<String>,
    plan: WeeklyPlan,
    blackouts: ExclusionSet,
    completed_hours: f64,
    outcome: Option<PlanOutcome>,
}

impl FormState {
    fn new(config: AppConfig) -> Self {
        let mut state = Self {
            config,
            program: None,
            course: None,
            start_date: None,
            start_time: None,
            plan: WeeklyPlan::new(),
            blackouts: ExclusionSet::new(),
            completed_hours: 0.0,
            outcome: None,
        };
        state.select_first_course();
        state
    }

    fn select_first_course(&mut self) {
        let first = self.config.programs.iter().find_map(|program| {
            program
                .courses
                .first()
                .map(|course| (program.name.clone(), course.name.clone()))
        });
        match first {
            Some((program, course)) => self.select(program, course),
            None => {
                self.program = None;
                self.course = None;
                self.plan.clear();
                self.outcome = None;
            }
        }
    }

    fn select(&mut self, program: String, course: String) {
        self.plan = match self.config.find_course(&program, &course) {
            Ok(found) => WeeklyPlan::from_entries(
                SEEDED_PLAN
                    .iter()
                    .copied()
                    .filter(|(weekday, _)| found.allows(*weekday)),
            ),
            Err(_) => WeeklyPlan::new(),
        };
        self.program = Some(program);
        self.course = Some(course);
        self.outcome = None;
    }

    fn request(&self, reference_date: Option<String>) -> PlanRequest {
        PlanRequest {
            program: self.program.clone().unwrap_or_default(),
            course: self.course.clone().unwrap_or_default(),
            start_date: self.start_date.clone(),
            start_time: self.start_time.clone(),
            weekly_plan: self.plan.clone(),
            blackouts: self
                .blackouts
                .sorted()
                .into_iter()
                .map(calendar::format_iso_date)
                .collect(),
            completed_hours: Some(self.completed_hours),
            reference_date,
        }
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| match col.get(row_idx) {
                Ok(AnyValue::Null) | Err(_) => String::new(),
                Ok(AnyValue::Float64(v)) => format!("{v:.2}"),
                Ok(AnyValue::Date(days)) => table::date_from_i32(days)
                    .map(calendar::format_iso_date)
                    .unwrap_or_default(),
                Ok(AnyValue::String(s)) => s.to_string(),
                Ok(av) => av.to_string(),
            })
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, value) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(value.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  config show                        Show the active configuration (JSON)\n  config load <path>                 Load configuration from a JSON file\n  config save <path>                 Save configuration to a JSON file\n  config default                     Restore the built-in configuration\n  courses                            List programs and courses\n  use <program> | <course>           Select a course\n  start <YYYY-MM-DD>                 Set the start date\n  time <HH:MM>                       Set the session start time (default 09:00)\n  plan <weekday 1-7> <hours>         Set hours for a weekday (0 removes it)\n  plan clear                         Remove every weekday from the plan\n  plan show                          Show the weekly plan\n  blackout add <YYYY-MM-DD>          Add a personal blackout date\n  blackout remove <YYYY-MM-DD>       Remove a personal blackout date\n  blackout list                      List personal blackout dates\n  completed <hours>                  Set hours completed so far\n  generate [YYYY-MM-DD]              Build the schedule (pace measured at date, default today)\n  show                               Show the last generated schedule\n  pace [YYYY-MM-DD]                  Re-evaluate pace for the last schedule\n  export <csv|ics> <path>            Export the last schedule\n  quit|exit                          Exit"
    );
}

fn print_courses(config: &AppConfig) {
    for program in &config.programs {
        println!("{}", program.name);
        for course in &program.courses {
            println!(
                "  {:<24} {:>7.2}h  {}",
                course.name,
                course.total_hours,
                course.allowed_day_names()
            );
        }
    }
}

fn print_selection(state: &FormState) {
    match (&state.program, &state.course) {
        (Some(program), Some(course)) => match state.config.find_course(program, course) {
            Ok(found) => println!(
                "Selected {} / {} ({:.2}h, allowed: {})",
                program,
                course,
                found.total_hours,
                found.allowed_day_names()
            ),
            Err(e) => println!("Error: {}", e),
        },
        _ => println!("No course selected."),
    }
}

fn print_plan(plan: &WeeklyPlan) {
    if plan.is_empty() {
        println!("Weekly plan is empty.");
        return;
    }
    for (weekday, hours) in plan.entries() {
        println!("  {}  {:.2}h", calendar::weekday_name(weekday), hours);
    }
    println!("  total {:.2}h/week", plan.weekly_total());
}

fn print_outcome(outcome: &PlanOutcome) {
    let rows = outcome.table_rows();
    match table::rows_to_dataframe(&rows) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering table: {}", e),
    }
    println!("Schedule: {}", outcome.summary.to_cli_summary());
    print_pace(outcome);
}

fn print_pace(outcome: &PlanOutcome) {
    println!(
        "Pace at {}: {}",
        outcome.reference_date,
        outcome.pace.to_cli_summary(outcome.completed_hours)
    );
}

fn parse_date_arg(value: Option<&str>) -> Result<Option<String>, String> {
    match value {
        None => Ok(None),
        Some(v) => calendar::parse_iso_date(v)
            .map(|_| Some(v.to_string()))
            .map_err(|e| e.to_string()),
    }
}

fn generate(state: &mut FormState, reference_date: Option<String>) {
    let request = state.request(reference_date);
    let resolved = match request.resolve(&state.config) {
        Ok(resolved) => resolved,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    let today = match state.config.today() {
        Ok(today) => today,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    let outcome = resolved.run(&state.config.scheduler(), today);
    print_outcome(&outcome);
    state.outcome = Some(outcome);
}

fn export_outcome(state: &FormState, kind: &str, path: &str) {
    let Some(outcome) = &state.outcome else {
        println!("Nothing to export; run 'generate' first.");
        return;
    };
    if outcome.schedule.sessions.is_empty() {
        println!("Schedule has no sessions; nothing to export.");
        return;
    }
    let result = match kind {
        "csv" => export::write_csv(path, &outcome.table_rows()),
        _ => match state.config.now_local() {
            Ok(dtstamp) => {
                let batch = export::batch_token(dtstamp);
                export::write_ics(path, &outcome.calendar_events(&batch, dtstamp))
            }
            Err(e) => {
                println!("Error: {}", e);
                return;
            }
        },
    };
    match result {
        Ok(_) => println!("Exported {} to {}.", kind, path),
        Err(e) => println!("Error exporting: {}", e),
    }
}

fn main() {
    if let Err(e) = logging::init_logging("warn") {
        eprintln!("logging disabled: {e}");
    }

    let mut state = FormState::new(AppConfig::default());

    println!("Course Planner (CLI) - type 'help' for commands\n");
    print_selection(&state);
    print_plan(&state.plan);

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
            "quit" | "exit" => break,
            "config" => match (parts.next(), parts.next()) {
                (Some("show"), _) => match serde_json::to_string_pretty(&state.config) {
                    Ok(json) => println!("{}", json),
                    Err(e) => println!("Error: {}", e),
                },
                (Some("load"), Some(path)) => match AppConfig::load(path) {
                    Ok(config) => {
                        state.config = config;
                        state.select_first_course();
                        println!("Configuration loaded from {}.", path);
                        print_selection(&state);
                    }
                    Err(e) => println!("Error loading configuration: {}", e),
                },
                (Some("save"), Some(path)) => match state.config.save(path) {
                    Ok(_) => println!("Configuration saved to {}.", path),
                    Err(e) => println!("Error saving configuration: {}", e),
                },
                (Some("default"), _) => {
                    state.config = AppConfig::default();
                    state.select_first_course();
                    println!("Configuration reset to defaults.");
                    print_selection(&state);
                }
                _ => println!("Usage: config show|default|load <path>|save <path>"),
            },
            "courses" => print_courses(&state.config),
            "use" => {
                let rest = input["use".len()..].trim();
                match rest.split_once('|') {
                    Some((program, course)) => {
                        let (program, course) = (program.trim(), course.trim());
                        match state.config.find_course(program, course) {
                            Ok(_) => {
                                state.select(program.to_string(), course.to_string());
                                print_selection(&state);
                                print_plan(&state.plan);
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    None => println!("Usage: use <program> | <course>"),
                }
            }
            "start" => match parts.next() {
                Some(value) => match calendar::parse_iso_date(value) {
                    Ok(date) => {
                        state.start_date = Some(calendar::format_iso_date(date));
                        println!("Start date set to {}.", date);
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: start <YYYY-MM-DD>"),
            },
            "time" => match parts.next() {
                Some(value) => match calendar::parse_time_of_day(value) {
                    Ok(time) => {
                        state.start_time = Some(calendar::format_time_of_day(time));
                        println!("Start time set to {}.", calendar::format_time_of_day(time));
                    }
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: time <HH:MM>"),
            },
            "plan" => match (parts.next(), parts.next()) {
                (Some("clear"), _) => {
                    state.plan.clear();
                    println!("Weekly plan cleared.");
                }
                (Some("show"), _) => print_plan(&state.plan),
                (Some(day_s), Some(hours_s)) => {
                    let weekday = match day_s
                        .parse::<u8>()
                        .map_err(|e| e.to_string())
                        .and_then(|n| calendar::weekday_from_number(n).map_err(|e| e.to_string()))
                    {
                        Ok(wd) => wd,
                        Err(_) => {
                            println!("Invalid weekday (1=Mon..7=Sun)");
                            continue;
                        }
                    };
                    let hours: f64 = match hours_s.parse() {
                        Ok(v) => v,
                        Err(_) => {
                            println!("Invalid hours");
                            continue;
                        }
                    };
                    if hours > 0.0 {
                        state.plan.set(weekday, hours);
                    } else {
                        state.plan.remove(weekday);
                    }
                    print_plan(&state.plan);
                }
                _ => println!("Usage: plan <weekday 1-7> <hours> | plan clear | plan show"),
            },
            "blackout" => match (parts.next(), parts.next()) {
                (Some("list"), _) => {
                    if state.blackouts.is_empty() {
                        println!("No blackout dates.");
                    } else {
                        println!("{} blackout date(s):", state.blackouts.len());
                    }
                    for date in state.blackouts.sorted() {
                        println!("  {}", date);
                    }
                }
                (Some(action @ ("add" | "remove")), Some(value)) => {
                    let date: NaiveDate = match calendar::parse_iso_date(value) {
                        Ok(d) => d,
                        Err(_) => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    };
                    if action == "add" {
                        state.blackouts.insert(date);
                        println!("Blackout {} added.", date);
                    } else if state.blackouts.remove(date) {
                        println!("Blackout {} removed.", date);
                    } else {
                        println!("Blackout {} not found.", date);
                    }
                }
                _ => println!("Usage: blackout add|remove <YYYY-MM-DD> | blackout list"),
            },
            "completed" => match parts.next().map(str::parse::<f64>) {
                Some(Ok(hours)) => {
                    state.completed_hours = if hours.is_finite() { hours.max(0.0) } else { 0.0 };
                    println!("Completed hours set to {:.2}.", state.completed_hours);
                }
                Some(Err(_)) => println!("Invalid hours"),
                None => println!("Usage: completed <hours>"),
            },
            "generate" => match parse_date_arg(parts.next()) {
                Ok(reference) => generate(&mut state, reference),
                Err(e) => println!("Error: {}", e),
            },
            "show" => match &state.outcome {
                Some(outcome) => print_outcome(outcome),
                None => println!("No schedule yet; run 'generate'."),
            },
            "pace" => match parse_date_arg(parts.next()) {
                Ok(reference) => {
                    if state.outcome.is_none() {
                        println!("No schedule yet; run 'generate'.");
                        continue;
                    }
                    let request = state.request(reference);
                    let resolved = match request.resolve(&state.config) {
                        Ok(r) => r,
                        Err(e) => {
                            println!("Error: {}", e);
                            continue;
                        }
                    };
                    match state.config.today() {
                        Ok(today) => {
                            let outcome = resolved.run(&state.config.scheduler(), today);
                            print_pace(&outcome);
                            state.outcome = Some(outcome);
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
            "export" => match (parts.next(), parts.next()) {
                (Some(kind @ ("csv" | "ics")), Some(path)) => export_outcome(&state, kind, path),
                _ => println!("Usage: export <csv|ics> <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
