//! The field geometry manager.
//!
//! [`RoboCupField`] owns the settings tree of a field: scalar dimensions, the
//! line and arc collections, the ball models and the triggers. Tree signals
//! are wired to the operations below at construction:
//!
//! | signal | operation |
//! |---|---|
//! | `Number of Line Segments` edited | [`RoboCupField::resize_field_lines`] |
//! | `Number of Arcs` edited | [`RoboCupField::resize_field_arcs`] |
//! | `Field Lines` loaded | [`RoboCupField::process_new_field_lines`] |
//! | `Field Arcs` loaded | [`RoboCupField::process_new_field_arcs`] |
//! | `Field Lines/Arcs` fired | [`RoboCupField::update_field_lines_and_arcs`] |
//! | `Division X` fired | [`RoboCupField::apply_division`] |
//!
//! Mutations take the write half of one lock, rendering takes the read half.
//! `changed` is emitted after every mutation, with the lock released.

mod collection;
mod defaults;
mod render;
mod settings;

use std::sync::{Arc, Weak};

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use crate::arc::FieldCircularArc;
use crate::division::{Division, FieldDimensions};
use crate::error::FieldError;
use crate::line::FieldLine;
use crate::models::FieldModels;
use crate::record::FieldMarking;
use crate::var::{Signal, VarBool, VarDouble, VarInt, VarList, VarNode, VarTrigger};

pub use defaults::{default_field_arcs, default_field_lines};

/// Scalar parameter leaves of the field.
#[derive(Debug)]
pub struct FieldParams {
    pub field_length: VarDouble,
    pub field_width: VarDouble,
    pub goal_width: VarDouble,
    pub goal_depth: VarDouble,
    pub goal_height: VarDouble,
    pub boundary_width: VarDouble,
    pub line_thickness: VarDouble,
    pub penalty_area_depth: VarDouble,
    pub penalty_area_width: VarDouble,
    pub goal_center_to_penalty_mark: VarDouble,
    pub center_circle_radius: VarDouble,
    pub ball_radius: VarDouble,
    pub max_robot_radius: VarDouble,
    pub num_cameras_total: VarInt,
    pub num_cameras_local: VarInt,
    pub center_line: VarBool,
}

impl FieldParams {
    fn new(dims: &FieldDimensions) -> Self {
        Self {
            field_length: VarDouble::new("Field Length", dims.field_length),
            field_width: VarDouble::new("Field Width", dims.field_width),
            goal_width: VarDouble::new("Goal Width", dims.goal_width),
            goal_depth: VarDouble::new("Goal Depth", dims.goal_depth),
            goal_height: VarDouble::new("Goal Height", dims.goal_height),
            boundary_width: VarDouble::new("Boundary Width", dims.boundary_width),
            line_thickness: VarDouble::new("Line Thickness", dims.line_thickness),
            penalty_area_depth: VarDouble::new("Penalty Area Depth", dims.penalty_area_depth),
            penalty_area_width: VarDouble::new("Penalty Area Width", dims.penalty_area_width),
            goal_center_to_penalty_mark: VarDouble::new(
                "Goal Line to Penalty Mark",
                dims.goal_center_to_penalty_mark,
            ),
            center_circle_radius: VarDouble::new(
                "Center Circle Radius",
                dims.center_circle_radius,
            ),
            ball_radius: VarDouble::new("Ball Radius", dims.ball_radius),
            max_robot_radius: VarDouble::new("Max Robot Radius", dims.max_robot_radius),
            num_cameras_total: VarInt::new("Total Number of Cameras", dims.num_cameras_total),
            num_cameras_local: VarInt::new("Local Number of Cameras", dims.num_cameras_local),
            center_line: VarBool::new("Center Line", true),
        }
    }

    fn dimensions(&self) -> FieldDimensions {
        FieldDimensions {
            field_length: self.field_length.get(),
            field_width: self.field_width.get(),
            goal_width: self.goal_width.get(),
            goal_depth: self.goal_depth.get(),
            goal_height: self.goal_height.get(),
            boundary_width: self.boundary_width.get(),
            line_thickness: self.line_thickness.get(),
            penalty_area_depth: self.penalty_area_depth.get(),
            penalty_area_width: self.penalty_area_width.get(),
            goal_center_to_penalty_mark: self.goal_center_to_penalty_mark.get(),
            center_circle_radius: self.center_circle_radius.get(),
            ball_radius: self.ball_radius.get(),
            max_robot_radius: self.max_robot_radius.get(),
            num_cameras_total: self.num_cameras_total.get(),
            num_cameras_local: self.num_cameras_local.get(),
        }
    }

    fn set_dimensions(&self, dims: &FieldDimensions) {
        self.field_length.set(dims.field_length);
        self.field_width.set(dims.field_width);
        self.goal_width.set(dims.goal_width);
        self.goal_depth.set(dims.goal_depth);
        self.goal_height.set(dims.goal_height);
        self.boundary_width.set(dims.boundary_width);
        self.line_thickness.set(dims.line_thickness);
        self.penalty_area_depth.set(dims.penalty_area_depth);
        self.penalty_area_width.set(dims.penalty_area_width);
        self.goal_center_to_penalty_mark
            .set(dims.goal_center_to_penalty_mark);
        self.center_circle_radius.set(dims.center_circle_radius);
        self.ball_radius.set(dims.ball_radius);
        self.max_robot_radius.set(dims.max_robot_radius);
        self.num_cameras_total.set(dims.num_cameras_total);
        self.num_cameras_local.set(dims.num_cameras_local);
    }
}

#[derive(Debug, Default)]
struct FieldMarkings {
    lines: Vec<FieldLine>,
    arcs: Vec<FieldCircularArc>,
}

/// Editable geometry of an SSL field.
#[derive(Debug)]
pub struct RoboCupField {
    settings: VarList,
    params: FieldParams,
    models: FieldModels,
    update_shapes: VarTrigger,
    division_triggers: [VarTrigger; 3],
    num_lines: VarInt,
    num_arcs: VarInt,
    field_lines_list: VarList,
    field_arcs_list: VarList,
    markings: RwLock<FieldMarkings>,
    changed: Signal<RoboCupField>,
}

impl RoboCupField {
    /// Creates a field with the startup dimensions and default markings.
    pub fn new() -> Arc<Self> {
        Self::with_dimensions(&FieldDimensions::default())
    }

    pub fn with_dimensions(dims: &FieldDimensions) -> Arc<Self> {
        let field = Arc::new_cyclic(|weak: &Weak<Self>| {
            let field = Self {
                settings: VarList::new("Field Configuration"),
                params: FieldParams::new(dims),
                models: FieldModels::default(),
                update_shapes: VarTrigger::new("Field Lines/Arcs", "Update"),
                division_triggers: Division::ALL.map(|d| VarTrigger::new(d.label(), "Apply")),
                num_lines: VarInt::new("Number of Line Segments", 0),
                num_arcs: VarInt::new("Number of Arcs", 0),
                field_lines_list: VarList::new_collection("Field Lines"),
                field_arcs_list: VarList::new_collection("Field Arcs"),
                markings: RwLock::new(FieldMarkings::default()),
                changed: Signal::default(),
            };
            field.build_tree();
            field.connect_handlers(weak);
            field
        });

        if field.is_empty() {
            field.update_field_lines_and_arcs();
        }
        field
    }

    fn build_tree(&self) {
        let p = &self.params;
        let mut children = vec![self.models.settings.var()];
        children.extend(self.division_triggers.iter().map(VarTrigger::var));
        children.extend([
            p.field_length.var(),
            p.field_width.var(),
            p.goal_width.var(),
            p.goal_depth.var(),
            p.goal_height.var(),
            p.boundary_width.var(),
            p.line_thickness.var(),
            p.penalty_area_depth.var(),
            p.penalty_area_width.var(),
            p.goal_center_to_penalty_mark.var(),
            p.center_circle_radius.var(),
            p.ball_radius.var(),
            p.max_robot_radius.var(),
            p.num_cameras_total.var(),
            p.num_cameras_local.var(),
            p.center_line.var(),
            self.num_lines.var(),
            self.num_arcs.var(),
            self.update_shapes.var(),
            self.field_lines_list.var(),
            self.field_arcs_list.var(),
        ]);
        for child in children {
            self.settings.add_child(Arc::clone(child));
        }
    }

    fn connect_handlers(&self, weak: &Weak<Self>) {
        fn on(node: &VarNode, loaded: bool, weak: &Weak<RoboCupField>, f: fn(&RoboCupField)) {
            let weak = weak.clone();
            let handler = move |_: &VarNode| {
                if let Some(field) = weak.upgrade() {
                    f(&field);
                }
            };
            if loaded {
                node.loaded().connect(handler);
            } else {
                node.edited().connect(handler);
            }
        }

        on(&self.update_shapes, false, weak, Self::update_field_lines_and_arcs);
        on(&self.num_lines, false, weak, Self::resize_field_lines);
        on(&self.num_arcs, false, weak, Self::resize_field_arcs);
        on(&self.field_lines_list, true, weak, Self::process_new_field_lines);
        on(&self.field_arcs_list, true, weak, Self::process_new_field_arcs);
        on(&self.division_triggers[0], false, weak, |f| f.apply_division(Division::A));
        on(&self.division_triggers[1], false, weak, |f| f.apply_division(Division::B));
        on(&self.division_triggers[2], false, weak, |f| f.apply_division(Division::C));
    }

    fn is_empty(&self) -> bool {
        let markings = self.markings.read();
        markings.lines.is_empty() && markings.arcs.is_empty()
    }

    /// Root of the settings tree.
    pub fn settings(&self) -> &VarList {
        &self.settings
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn models(&self) -> &FieldModels {
        &self.models
    }

    pub fn update_trigger(&self) -> &VarTrigger {
        &self.update_shapes
    }

    pub fn division_trigger(&self, division: Division) -> &VarTrigger {
        match division {
            Division::A => &self.division_triggers[0],
            Division::B => &self.division_triggers[1],
            Division::C => &self.division_triggers[2],
        }
    }

    pub fn num_lines(&self) -> &VarInt {
        &self.num_lines
    }

    pub fn num_arcs(&self) -> &VarInt {
        &self.num_arcs
    }

    pub fn field_lines_list(&self) -> &VarList {
        &self.field_lines_list
    }

    pub fn field_arcs_list(&self) -> &VarList {
        &self.field_arcs_list
    }

    /// Emitted after every mutating operation.
    pub fn changed(&self) -> &Signal<RoboCupField> {
        &self.changed
    }

    /// Read access to the line records. Holds the read lock until dropped.
    pub fn lines(&self) -> MappedRwLockReadGuard<'_, [FieldLine]> {
        RwLockReadGuard::map(self.markings.read(), |m| m.lines.as_slice())
    }

    /// Read access to the arc records. Holds the read lock until dropped.
    pub fn arcs(&self) -> MappedRwLockReadGuard<'_, [FieldCircularArc]> {
        RwLockReadGuard::map(self.markings.read(), |m| m.arcs.as_slice())
    }

    pub fn dimensions(&self) -> FieldDimensions {
        let _markings = self.markings.read();
        self.params.dimensions()
    }

    /// Overwrites the scalar dimensions. Markings are not regenerated.
    pub fn set_dimensions(&self, dims: &FieldDimensions) {
        {
            let _markings = self.markings.write();
            self.params.set_dimensions(dims);
        }
        self.changed.emit(self);
    }

    /// Applies a division preset. Markings are not regenerated; fire the
    /// update trigger (or call [`Self::update_field_lines_and_arcs`]) to
    /// derive them from the new dimensions.
    pub fn apply_division(&self, division: Division) {
        tracing::info!("[field] Applying {} geometry", division.label());
        self.set_dimensions(&division.dimensions());
    }

    /// Replaces all markings with the defaults derived from the current
    /// dimensions.
    pub fn update_field_lines_and_arcs(&self) {
        {
            let mut markings = self.markings.write();
            let dims = self.params.dimensions();

            self.field_lines_list.clear_children();
            markings.lines.clear();
            markings.lines = default_field_lines(&dims, self.params.center_line.get());
            for line in &markings.lines {
                self.field_lines_list.add_child(Arc::clone(line.node()));
            }
            self.num_lines.set(collection::count_value(markings.lines.len()));

            self.field_arcs_list.clear_children();
            markings.arcs.clear();
            markings.arcs = default_field_arcs(&dims);
            for arc in &markings.arcs {
                self.field_arcs_list.add_child(Arc::clone(arc.node()));
            }
            self.num_arcs.set(collection::count_value(markings.arcs.len()));

            tracing::info!(
                "[field] Generated {} default lines and {} arcs",
                markings.lines.len(),
                markings.arcs.len()
            );
            self.verify(&markings);
        }
        self.changed.emit(self);
    }

    /// Grows or shrinks the line collection to `Number of Line Segments`.
    pub fn resize_field_lines(&self) {
        {
            let mut markings = self.markings.write();
            collection::resize(&mut markings.lines, &self.field_lines_list, &self.num_lines);
            self.verify(&markings);
        }
        self.changed.emit(self);
    }

    /// Grows or shrinks the arc collection to `Number of Arcs`.
    pub fn resize_field_arcs(&self) {
        {
            let mut markings = self.markings.write();
            collection::resize(&mut markings.arcs, &self.field_arcs_list, &self.num_arcs);
            self.verify(&markings);
        }
        self.changed.emit(self);
    }

    /// Syncs the line records with the children of `Field Lines`.
    pub fn process_new_field_lines(&self) {
        {
            let mut markings = self.markings.write();
            collection::reconcile(&mut markings.lines, &self.field_lines_list, &self.num_lines);
            self.verify(&markings);
        }
        self.changed.emit(self);
    }

    /// Syncs the arc records with the children of `Field Arcs`.
    pub fn process_new_field_arcs(&self) {
        {
            let mut markings = self.markings.write();
            collection::reconcile(&mut markings.arcs, &self.field_arcs_list, &self.num_arcs);
            self.verify(&markings);
        }
        self.changed.emit(self);
    }

    /// Checks that both record collections agree with their tree node and
    /// count leaf.
    pub fn check_consistency(&self) -> Result<(), FieldError> {
        let markings = self.markings.read();
        self.check_markings(&markings)
    }

    fn check_markings(&self, markings: &FieldMarkings) -> Result<(), FieldError> {
        collection::check(&markings.lines, &self.field_lines_list, &self.num_lines)?;
        collection::check(&markings.arcs, &self.field_arcs_list, &self.num_arcs)
    }

    fn verify(&self, markings: &FieldMarkings) {
        let result = self.check_markings(markings);
        if let Err(err) = &result {
            tracing::error!("[field] {err}");
        }
        debug_assert!(result.is_ok(), "field markings out of sync with the settings tree");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_new_field_generates_defaults() {
        let field = RoboCupField::new();
        assert_eq!(field.lines().len(), 12);
        assert_eq!(field.arcs().len(), 1);
        assert_eq!(field.num_lines().get(), 12);
        assert_eq!(field.num_arcs().get(), 1);
        field.check_consistency().unwrap();
    }

    #[test]
    fn test_settings_tree_layout() {
        let field = RoboCupField::new();
        let names: Vec<String> = field.settings().children().iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), 25);
        assert_eq!(names[0], "Models");
        assert_eq!(names[1], "Division A");
        assert_eq!(names[4], "Field Length");
        assert_eq!(names[20], "Number of Line Segments");
        assert_eq!(names[22], "Field Lines/Arcs");
        assert_eq!(names[23], "Field Lines");
        assert_eq!(names[24], "Field Arcs");
    }

    #[test]
    fn test_editing_count_resizes_lines() {
        let field = RoboCupField::new();
        field.num_lines().edit(14);
        {
            let lines = field.lines();
            assert_eq!(lines.len(), 14);
            assert_eq!(lines[12].name(), "Line 12");
            assert_eq!(lines[13].name(), "Line 13");
        }
        field.check_consistency().unwrap();

        field.num_lines().edit(2);
        {
            let lines = field.lines();
            assert_eq!(lines.len(), 2);
            assert_eq!(lines[0].name(), "TopTouchLine");
        }
        assert_eq!(field.field_lines_list().child_count(), 2);
        field.check_consistency().unwrap();
    }

    #[test]
    fn test_resize_from_empty() {
        let field = RoboCupField::new();
        field.num_lines().edit(0);
        assert!(field.lines().is_empty());

        field.num_lines().edit(3);
        let lines = field.lines();
        let names: Vec<String> = lines.iter().map(FieldLine::name).collect();
        assert_eq!(names, vec!["Line 0", "Line 1", "Line 2"]);
        for line in lines.iter() {
            assert_eq!(line.shape_type().get(), "Undefined");
            assert!((line.thickness() - 10.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_resize_is_idempotent() {
        let field = RoboCupField::new();
        field.num_arcs().edit(3);
        let before: Vec<_> = field.arcs().iter().map(|a| Arc::clone(a.node())).collect();

        field.num_arcs().edit(3);
        let after: Vec<_> = field.arcs().iter().map(|a| Arc::clone(a.node())).collect();
        assert_eq!(before.len(), 3);
        assert!(before.iter().zip(&after).all(|(a, b)| Arc::ptr_eq(a, b)));
        assert_eq!(field.arcs()[2].name(), "Arc 2");
    }

    #[test]
    fn test_negative_count_clears_collection() {
        let field = RoboCupField::new();
        field.num_arcs().edit(-4);
        assert!(field.arcs().is_empty());
        assert_eq!(field.num_arcs().get(), 0);
        field.check_consistency().unwrap();
    }

    #[test]
    fn test_division_preset_keeps_markings() {
        let field = RoboCupField::new();
        field.division_trigger(Division::B).fire();

        assert_eq!(field.dimensions(), Division::B.dimensions());
        // markings still reflect the previous dimensions
        assert_eq!(field.lines()[0].p1(), [-6020.0, 4510.0]);

        field.update_trigger().fire();
        assert_eq!(field.lines()[0].p1(), [-4500.0, 3000.0]);
    }

    #[test]
    fn test_center_line_toggle() {
        let field = RoboCupField::new();
        field.params().center_line.set(false);
        field.update_field_lines_and_arcs();
        assert_eq!(field.lines().len(), 11);
        assert!(field.lines().iter().all(|l| l.name() != "CenterLine"));
        field.check_consistency().unwrap();
    }

    #[test]
    fn test_regenerate_discards_edits() {
        let field = RoboCupField::new();
        field.num_lines().edit(20);
        field.update_field_lines_and_arcs();
        assert_eq!(field.lines().len(), 12);
        assert_eq!(field.field_lines_list().child_count(), 12);
    }

    #[test]
    fn test_changed_signal_fires_after_mutations() {
        let field = RoboCupField::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_listener = Arc::clone(&hits);
        field.changed().connect(move |f| {
            // the lock is released while listeners run
            assert!(f.check_consistency().is_ok());
            hits_in_listener.fetch_add(1, Ordering::SeqCst);
        });

        field.num_lines().edit(5);
        field.apply_division(Division::A);
        field.update_field_lines_and_arcs();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_with_dimensions() {
        let field = RoboCupField::with_dimensions(&Division::C.dimensions());
        assert_eq!(field.dimensions(), Division::C.dimensions());
        assert_eq!(field.lines()[0].p2(), [2250.0, 1500.0]);
    }
}
