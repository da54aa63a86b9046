// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Planar sketch model
//!
//! Points, lines and circles drawn on the XY plane, exported as a geometry
//! list property.

use crate::error::Result;
use crate::native::{
    type_tag, Circle, Geometry, LineSegment, NativeProp, NativeProperty, NativeValue, Vector,
};
use crate::props::HandlerRegistry;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type Position = Vector2<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SketchElement {
    Line { start: Position, end: Position },
    Circle { center: Position, radius: f64 },
}

impl SketchElement {
    fn to_geometry(&self) -> Geometry {
        match self {
            SketchElement::Line { start, end } => {
                LineSegment::new(lift(start), lift(end)).into()
            }
            SketchElement::Circle { center, radius } => {
                Circle::new(lift(center), Vector::z(), *radius).into()
            }
        }
    }
}

fn lift(p: &Position) -> Vector {
    Vector::new(p.x, p.y, 0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SketchEntry {
    id: String,
    element: SketchElement,
    /// Ids of the points this element is anchored on
    control_points: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sketch {
    points: Vec<(String, Position)>,
    elements: Vec<SketchEntry>,
    next_id: u64,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", kind, self.next_id)
    }

    pub fn add_point(&mut self, position: Position) -> String {
        let id = self.allocate("point");
        self.points.push((id.clone(), position));
        id
    }

    /// Remove a point together with every line and circle anchored on it.
    ///
    /// Returns the ids of the removed elements.
    pub fn remove_point(&mut self, id: &str) -> Vec<String> {
        self.points.retain(|(pid, _)| pid != id);

        let mut removed = Vec::new();
        self.elements.retain(|entry| {
            let anchored = entry.control_points.iter().any(|p| p == id);
            if anchored {
                removed.push(entry.id.clone());
            }
            !anchored
        });
        removed
    }

    pub fn point(&self, id: &str) -> Option<&Position> {
        self.points.iter().find(|(pid, _)| pid == id).map(|(_, p)| p)
    }

    pub fn point_at(&self, position: &Position) -> Option<&str> {
        self.points
            .iter()
            .find(|(_, p)| p == position)
            .map(|(id, _)| id.as_str())
    }

    /// Add a line; its end points are registered as control points
    pub fn add_line(&mut self, start: Position, end: Position) -> String {
        let control_points = vec![self.ensure_point(start), self.ensure_point(end)];
        self.push("line", SketchElement::Line { start, end }, control_points)
    }

    /// Add a circle; its center is registered as a control point
    pub fn add_circle(&mut self, center: Position, radius: f64) -> String {
        let control_points = vec![self.ensure_point(center)];
        self.push("circle", SketchElement::Circle { center, radius }, control_points)
    }

    fn push(
        &mut self,
        kind: &str,
        element: SketchElement,
        control_points: Vec<String>,
    ) -> String {
        let id = self.allocate(kind);
        self.elements.push(SketchEntry {
            id: id.clone(),
            element,
            control_points,
        });
        id
    }

    pub fn remove_line(&mut self, id: &str) {
        self.elements
            .retain(|e| !(e.id == id && matches!(e.element, SketchElement::Line { .. })));
    }

    pub fn remove_circle(&mut self, id: &str) {
        self.elements
            .retain(|e| !(e.id == id && matches!(e.element, SketchElement::Circle { .. })));
    }

    pub fn element(&self, id: &str) -> Option<&SketchElement> {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.element)
    }

    /// Ids of the lines anchored on point `point_id`
    pub fn lines_by_control_point(&self, point_id: &str) -> Vec<&str> {
        self.anchored(point_id, |e| matches!(e, SketchElement::Line { .. }))
    }

    /// Ids of the circles anchored on point `point_id`
    pub fn circles_by_control_point(&self, point_id: &str) -> Vec<&str> {
        self.anchored(point_id, |e| matches!(e, SketchElement::Circle { .. }))
    }

    /// Ids of lines and circles anchored at `position`
    pub fn elements_at(&self, position: &Position) -> Vec<&str> {
        match self.point_at(position) {
            Some(point_id) => self.anchored(point_id, |_| true),
            None => Vec::new(),
        }
    }

    fn anchored(&self, point_id: &str, kind: impl Fn(&SketchElement) -> bool) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|e| kind(&e.element) && e.control_points.iter().any(|p| p == point_id))
            .map(|e| e.id.as_str())
            .collect()
    }

    fn ensure_point(&mut self, position: Position) -> String {
        match self.point_at(&position) {
            Some(id) => id.to_owned(),
            None => self.add_point(position),
        }
    }

    /// Native geometries in drawing order
    pub fn to_geometries(&self) -> Vec<Geometry> {
        self.elements.iter().map(|e| e.element.to_geometry()).collect()
    }

    pub fn to_property(&self, name: &str) -> NativeProperty {
        NativeProperty::new(
            name,
            type_tag::PROPERTY_GEOMETRY_LIST,
            NativeValue::GeometryList(self.to_geometries()),
        )
    }

    /// Serialized `Part::PropertyGeometryList` value of this sketch
    pub fn export(&self, registry: &HandlerRegistry) -> Result<Option<Value>> {
        let geometries = self.to_geometries();
        registry.fc_to_jcad(
            type_tag::PROPERTY_GEOMETRY_LIST,
            NativeProp::GeometryList(&geometries),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::ConversionContext;
    use serde_json::json;

    #[test]
    fn test_control_points_are_shared() {
        let mut sketch = Sketch::new();
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);

        let l1 = sketch.add_line(a, b);
        let c1 = sketch.add_circle(b, 2.0);

        assert_eq!(sketch.points.len(), 2);
        assert_eq!(sketch.elements_at(&b), vec![l1.as_str(), c1.as_str()]);

        sketch.remove_line(&l1);
        assert!(sketch.element(&l1).is_none());
        assert_eq!(sketch.elements_at(&b), vec![c1.as_str()]);

        // wrong kind is ignored
        sketch.remove_line(&c1);
        assert!(sketch.element(&c1).is_some());
    }

    #[test]
    fn test_export_lies_on_xy_plane() {
        let mut sketch = Sketch::new();
        sketch.add_line(Position::new(0.0, 0.0), Position::new(1.0, 2.0));
        sketch.add_circle(Position::new(5.0, 5.0), 1.5);

        let registry = HandlerRegistry::standard(ConversionContext::detached());
        let value = sketch.export(&registry).unwrap().unwrap();

        assert_eq!(value[0]["TypeId"], json!("Part::GeomLineSegment"));
        assert_eq!(value[0]["EndY"], json!(2.0));
        assert_eq!(value[0]["EndZ"], json!(0.0));
        assert_eq!(value[1]["TypeId"], json!("Part::GeomCircle"));
        assert_eq!(value[1]["NormalZ"], json!(1.0));
        assert_eq!(value[1]["Radius"], json!(1.5));
    }

    #[test]
    fn test_remove_point() {
        let mut sketch = Sketch::new();
        let id = sketch.add_point(Position::new(1.0, 1.0));
        assert!(sketch.point(&id).is_some());
        assert!(sketch.remove_point(&id).is_empty());
        assert!(sketch.point(&id).is_none());
        assert!(sketch.to_property("Geometry").value == NativeValue::GeometryList(vec![]));
    }

    #[test]
    fn test_remove_point_removes_anchored_elements() {
        let mut sketch = Sketch::new();
        let a = Position::new(0.0, 0.0);
        let b = Position::new(2.0, 0.0);
        let c = Position::new(5.0, 5.0);

        let line = sketch.add_line(a, b);
        let circle = sketch.add_circle(b, 1.0);
        let other = sketch.add_circle(c, 1.0);

        let pb = sketch.point_at(&b).unwrap().to_owned();
        assert_eq!(sketch.lines_by_control_point(&pb), vec![line.as_str()]);
        assert_eq!(sketch.circles_by_control_point(&pb), vec![circle.as_str()]);

        let removed = sketch.remove_point(&pb);
        assert_eq!(removed, vec![line.clone(), circle.clone()]);
        assert!(sketch.element(&line).is_none());
        assert!(sketch.element(&circle).is_none());
        assert!(sketch.element(&other).is_some());
        assert_eq!(sketch.to_geometries().len(), 1);
    }
}
