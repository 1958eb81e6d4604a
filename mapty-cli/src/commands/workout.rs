use clap::{Args, ValueEnum};
use std::io::{self, Write};

use mapty_core::{
    Applied, Coords, JsonFileStore, SyncEngine, WorkoutForm, WorkoutStore, WorkoutType,
};

use crate::config::Config;
use crate::terminal::{short_id, Confirm, HomePosition, TerminalView};

type CommandResult = Result<(), Box<dyn std::error::Error>>;
type Engine<S> = SyncEngine<S, TerminalView>;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Numeric workout fields shared by `add` and `edit`.
#[derive(Args, Default)]
pub struct WorkoutFields {
    /// Distance in km
    #[arg(long, short, allow_hyphen_values = true)]
    pub distance: Option<f64>,

    /// Duration in minutes
    #[arg(long, short = 't', allow_hyphen_values = true)]
    pub duration: Option<f64>,

    /// Cadence in steps/min (running)
    #[arg(long, allow_hyphen_values = true)]
    pub cadence: Option<f64>,

    /// Elevation gain in meters (cycling)
    #[arg(long, short, allow_hyphen_values = true)]
    pub elevation: Option<f64>,

    /// Place the workout here instead of the current position
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub at: Option<Coords>,
}

impl WorkoutFields {
    fn has_values(&self) -> bool {
        self.distance.is_some()
            || self.duration.is_some()
            || self.cadence.is_some()
            || self.elevation.is_some()
            || self.at.is_some()
    }

    /// Overlays the given fields on `form`.
    fn apply(&self, form: &mut WorkoutForm) {
        if let Some(distance) = self.distance {
            form.distance = distance;
        }
        if let Some(duration) = self.duration {
            form.duration = duration;
        }
        if let Some(cadence) = self.cadence {
            form.cadence = Some(cadence);
        }
        if let Some(elevation) = self.elevation {
            form.elevation_gain = Some(elevation);
        }
    }
}

#[derive(Args)]
pub struct AddCommand {
    /// Workout type (running, cycling)
    pub workout_type: WorkoutType,

    #[command(flatten)]
    pub fields: WorkoutFields,
}

impl AddCommand {
    pub fn run(&self, config: &Config) -> CommandResult {
        let mut engine = open_engine(config, Confirm::Assume(false));
        self.execute(&mut engine, config.home.value)?;
        print_list(&engine, false)
    }

    fn execute<S: WorkoutStore>(
        &self,
        engine: &mut Engine<S>,
        home: Option<Coords>,
    ) -> CommandResult {
        // a pending edit supplies its own coordinates
        match self.fields.at {
            Some(coords) => engine.select_point(coords),
            None if engine.edit_session().is_none() => {
                let coords = engine.locate(&HomePosition(home))?;
                engine.select_point(coords);
            }
            None => {}
        }

        let mut form = WorkoutForm {
            workout_type: self.workout_type,
            distance: 0.0,
            duration: 0.0,
            cadence: None,
            elevation_gain: None,
        };
        self.fields.apply(&mut form);

        let applied = engine.submit_new_workout(&form)?;
        report(&applied);
        println!("Added workout {}", short_id(&applied.value));
        Ok(())
    }
}

#[derive(Args)]
pub struct EditCommand {
    /// Workout ID (or unique prefix)
    pub id: String,

    /// Change the workout type
    #[arg(long = "type", value_name = "TYPE")]
    pub workout_type: Option<WorkoutType>,

    #[command(flatten)]
    pub fields: WorkoutFields,
}

impl EditCommand {
    pub fn run(&self, config: &Config) -> CommandResult {
        let mut engine = open_engine(config, Confirm::Assume(false));
        self.execute(&mut engine)?;
        print_list(&engine, false)
    }

    fn execute<S: WorkoutStore>(&self, engine: &mut Engine<S>) -> CommandResult {
        let id = resolve_id(engine, &self.id)?;
        let applied = engine.begin_edit(&id)?;
        report(&applied);

        if !self.fields.has_values() && self.workout_type.is_none() {
            println!(
                "Editing workout {}. Run `mapty add` to submit the new values.",
                short_id(&id)
            );
            return Ok(());
        }

        let mut form = engine
            .get(&id)
            .map(WorkoutForm::from)
            .ok_or_else(|| format!("Workout not found: {}", id))?;
        if let Some(workout_type) = self.workout_type {
            form.workout_type = workout_type;
        }
        self.fields.apply(&mut form);
        if let Some(coords) = self.fields.at {
            engine.select_point(coords);
        }

        let applied = engine.submit_new_workout(&form)?;
        report(&applied);
        println!(
            "Replaced workout {} with {}",
            short_id(&id),
            short_id(&applied.value)
        );
        Ok(())
    }
}

#[derive(Args)]
pub struct DeleteCommand {
    /// Workout ID (or unique prefix)
    pub id: String,
}

impl DeleteCommand {
    pub fn run(&self, config: &Config) -> CommandResult {
        let mut engine = open_engine(config, Confirm::Assume(false));
        let id = resolve_id(&engine, &self.id)?;
        let applied = engine.delete_workout(&id)?;
        report(&applied);
        println!("Deleted workout {}", short_id(&id));
        print_list(&engine, false)
    }
}

#[derive(Args)]
pub struct ClearCommand {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

impl ClearCommand {
    pub fn run(&self, config: &Config) -> CommandResult {
        let confirm = if self.yes {
            Confirm::Assume(true)
        } else {
            Confirm::Prompt
        };
        let mut engine = open_engine(config, confirm);

        if engine.is_empty() {
            println!("No workouts to delete.");
            return Ok(());
        }

        match engine.delete_all_workouts() {
            Some(applied) => {
                report(&applied);
                println!("Deleted {} workout(s)", applied.value);
            }
            None => println!("Cancelled."),
        }
        print_list(&engine, false)
    }
}

#[derive(Args)]
pub struct ListCommand {
    /// Order by distance, shortest first
    #[arg(long, short)]
    pub sorted: bool,

    /// Also list map markers
    #[arg(long, short)]
    pub markers: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ListCommand {
    pub fn run(&self, config: &Config) -> CommandResult {
        let mut engine = open_engine(config, Confirm::Assume(false));
        if self.sorted {
            engine.toggle_sort();
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&engine.render_order())?);
                Ok(())
            }
            OutputFormat::Text => print_list(&engine, self.markers),
        }
    }
}

#[derive(Args)]
pub struct ShowCommand {
    /// Workout ID (or unique prefix)
    pub id: String,
}

impl ShowCommand {
    pub fn run(&self, config: &Config) -> CommandResult {
        let mut engine = open_engine(config, Confirm::Assume(false));
        let id = resolve_id(&engine, &self.id)?;
        let applied = engine.focus_workout(&id)?;
        report(&applied);

        if let Some(workout) = engine.get(&id) {
            println!("{}", workout);
            println!("ID:       {}", workout.id);
            println!("Location: {}", workout.coords);
            println!("Viewed:   {} time(s)", workout.click_count);
        }
        println!(
            "Map centred on {} (zoom {})",
            applied.value, config.zoom.value
        );
        Ok(())
    }
}

#[derive(Args)]
pub struct LocateCommand;

impl LocateCommand {
    pub fn run(&self, config: &Config) -> CommandResult {
        let mut engine = open_engine(config, Confirm::Assume(false));
        let coords = engine.locate(&HomePosition(config.home.value))?;
        println!("Current position: {}", coords);
        print_list(&engine, true)
    }
}

/// Builds the engine over the configured data directory and loads it.
fn open_engine(config: &Config, confirm: Confirm) -> Engine<JsonFileStore> {
    let store = JsonFileStore::new(config.data_dir.value.clone());
    let view = TerminalView::new(confirm, config.zoom.value);
    let mut engine = SyncEngine::new(store, view);

    let loaded = engine.load_persisted_workouts();
    report(&loaded);
    tracing::debug!(
        count = loaded.value,
        data_dir = %config.data_dir.value.display(),
        "Engine ready"
    );
    engine
}

fn report<T>(applied: &Applied<T>) {
    if let Some(warning) = &applied.warning {
        eprintln!("Warning: {}", warning);
    }
}

fn print_list<S: WorkoutStore>(engine: &Engine<S>, markers: bool) -> CommandResult {
    println!();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    engine.view().write_list(&mut out, markers)?;
    out.flush()?;
    Ok(())
}

/// Resolves a full id or a unique id prefix.
fn resolve_id<S: WorkoutStore>(engine: &Engine<S>, input: &str) -> Result<String, String> {
    if engine.get(input).is_some() {
        return Ok(input.to_string());
    }

    let matches: Vec<&str> = engine
        .workouts()
        .map(|workout| workout.id.as_str())
        .filter(|id| id.starts_with(input))
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(format!("Workout not found: {}", input)),
        _ => Err(format!(
            "Ambiguous workout ID '{}' matches {} workouts",
            input,
            matches.len()
        )),
    }
}
