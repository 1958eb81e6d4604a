//! Terminal rendering of the workout list and map markers.
//!
//! The view keeps what it has rendered (rows and markers) so a command can
//! print the final state once the engine is done with it.

use std::io::{self, BufRead, Write};

use mapty_core::{
    parse_confirmation, Coords, PositionProvider, PositionUnavailable, Workout, WorkoutKind,
    WorkoutView,
};

/// How the delete-all confirmation is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    /// Ask on stdin.
    Prompt,
    /// Answer without asking (`--yes`, or commands that never delete all).
    Assume(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub handle: u64,
    pub coords: Coords,
    pub popup: String,
}

pub struct TerminalView {
    rows: Vec<(String, String)>,
    markers: Vec<Marker>,
    next_marker: u64,
    confirm: Confirm,
    delete_all_visible: bool,
    form: Option<String>,
    focus: Option<Coords>,
    zoom: u8,
}

impl TerminalView {
    pub fn new(confirm: Confirm, zoom: u8) -> Self {
        Self {
            rows: Vec::new(),
            markers: Vec::new(),
            next_marker: 0,
            confirm,
            delete_all_visible: false,
            form: None,
            focus: None,
            zoom,
        }
    }

    /// Rendered rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(_, row)| row.as_str())
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn delete_all_visible(&self) -> bool {
        self.delete_all_visible
    }

    /// Where the map was last centred.
    pub fn focused(&self) -> Option<Coords> {
        self.focus
    }

    /// Form state message, if the form is open.
    pub fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }

    pub fn write_list(&self, out: &mut impl Write, with_markers: bool) -> io::Result<()> {
        if self.rows.is_empty() {
            writeln!(out, "No workouts yet. Add one with `mapty add`.")?;
        } else {
            for (_, row) in &self.rows {
                writeln!(out, "{}", row)?;
            }
        }

        if with_markers && !self.markers.is_empty() {
            writeln!(out)?;
            writeln!(out, "Markers:")?;
            for marker in &self.markers {
                writeln!(out, "  📍 {:<22} {}", marker.coords.to_string(), marker.popup)?;
            }
        }

        if self.delete_all_visible {
            writeln!(out)?;
            writeln!(out, "Total: {} workout(s). `mapty clear` deletes all.", self.rows.len())?;
        }

        Ok(())
    }
}

/// One list row: type, distance, duration, pace or speed, cadence or gain.
pub fn format_row(workout: &Workout) -> String {
    let icon = workout.workout_type().icon();
    let details = match &workout.kind {
        WorkoutKind::Running { cadence, pace } => {
            format!("⚡️ {:.1} min/km  🦶🏼 {} spm", pace, cadence)
        }
        WorkoutKind::Cycling {
            elevation_gain,
            speed,
        } => format!("⚡️ {:.1} km/h  ⛰ {} m", speed, elevation_gain),
    };

    format!(
        "{:<24} {} {} km  ⏱ {} min  {}  [{}]",
        workout.description,
        icon,
        workout.distance,
        workout.duration,
        details,
        short_id(&workout.id)
    )
}

/// First eight characters of an id, enough to address it from the CLI.
pub fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(i, _)| &id[..i])
}

impl WorkoutView for TerminalView {
    type Marker = u64;

    fn render_entry(&mut self, workout: &Workout) {
        self.rows.push((workout.id.clone(), format_row(workout)));
    }

    fn remove_entry(&mut self, id: &str) {
        self.rows.retain(|(row_id, _)| row_id != id);
    }

    fn remove_all_entries(&mut self) {
        self.rows.clear();
    }

    fn add_marker(&mut self, workout: &Workout) -> u64 {
        self.next_marker += 1;
        self.markers.push(Marker {
            handle: self.next_marker,
            coords: workout.coords,
            popup: workout.popup_text(),
        });
        self.next_marker
    }

    fn remove_marker(&mut self, marker: u64) {
        self.markers.retain(|m| m.handle != marker);
    }

    fn show_form(&mut self, editing: Option<&Workout>) {
        self.form = Some(match editing {
            Some(workout) => format!("Editing {}", workout.description),
            None => "New workout".to_string(),
        });
    }

    fn reset_form(&mut self) {
        self.form = None;
    }

    fn set_delete_all_visible(&mut self, visible: bool) {
        self.delete_all_visible = visible;
    }

    fn focus(&mut self, coords: Coords) {
        tracing::debug!(%coords, zoom = self.zoom, "Map centred");
        self.focus = Some(coords);
    }

    fn confirm_delete_all(&mut self) -> bool {
        match self.confirm {
            Confirm::Assume(answer) => answer,
            Confirm::Prompt => {
                eprint!("Do you want to delete everything? yes / no: ");
                let _ = io::stderr().flush();

                let mut answer = String::new();
                match io::stdin().lock().read_line(&mut answer) {
                    Ok(0) | Err(_) => parse_confirmation(None),
                    Ok(_) => parse_confirmation(Some(&answer)),
                }
            }
        }
    }
}

/// Geolocation stand-in: reports the configured home position.
pub struct HomePosition(pub Option<Coords>);

impl PositionProvider for HomePosition {
    fn current_position(&self) -> Result<Coords, PositionUnavailable> {
        self.0.ok_or_else(|| {
            PositionUnavailable(
                "no home position configured (set `home` in config.yaml or MAPTY_HOME)".into(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> Workout {
        Workout::running(Coords::new(40.7, -74.0), 5.0, 25.0, 150.0).unwrap()
    }

    fn ride() -> Workout {
        Workout::cycling(Coords::new(40.7, -74.0), 20.0, 60.0, 300.0).unwrap()
    }

    #[test]
    fn test_format_running_row() {
        let row = format_row(&run());
        assert!(row.contains("5 km"));
        assert!(row.contains("25 min"));
        assert!(row.contains("5.0 min/km"));
        assert!(row.contains("150 spm"));
    }

    #[test]
    fn test_format_cycling_row() {
        let row = format_row(&ride());
        assert!(row.contains("20 km"));
        assert!(row.contains("20.0 km/h"));
        assert!(row.contains("300 m"));
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_entries_and_markers() {
        let mut view = TerminalView::new(Confirm::Assume(true), 15);
        let (a, b) = (run(), ride());

        let marker_a = view.add_marker(&a);
        view.add_marker(&b);
        view.render_entry(&a);
        view.render_entry(&b);

        view.remove_entry(&a.id);
        view.remove_marker(marker_a);

        assert_eq!(view.rows().count(), 1);
        assert_eq!(view.markers().len(), 1);
        assert_eq!(view.markers()[0].popup, b.popup_text());
    }

    #[test]
    fn test_write_list() {
        let mut view = TerminalView::new(Confirm::Assume(true), 15);
        let workout = run();
        view.add_marker(&workout);
        view.render_entry(&workout);
        view.set_delete_all_visible(true);

        let mut out = Vec::new();
        view.write_list(&mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&workout.description));
        assert!(text.contains("Markers:"));
        assert!(text.contains("40.7,-74"));
        assert!(text.contains("Total: 1 workout(s)"));
    }

    #[test]
    fn test_write_empty_list() {
        let view = TerminalView::new(Confirm::Assume(true), 15);
        let mut out = Vec::new();
        view.write_list(&mut out, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No workouts yet"));
        assert!(!text.contains("Markers:"));
    }

    #[test]
    fn test_form_state() {
        let mut view = TerminalView::new(Confirm::Assume(false), 15);
        let workout = run();

        view.show_form(Some(&workout));
        assert_eq!(
            view.form(),
            Some(format!("Editing {}", workout.description).as_str())
        );
        view.reset_form();
        assert!(view.form().is_none());
        assert!(!view.confirm_delete_all());
    }

    #[test]
    fn test_home_position() {
        let coords = Coords::new(1.0, 2.0);
        assert_eq!(HomePosition(Some(coords)).current_position(), Ok(coords));
        assert!(HomePosition(None).current_position().is_err());
    }
}
