//! Field points and how their coordinates are interpreted.

use optrace_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{check_index, Result, SpecError};

/// Meaning of a field's `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldType {
    /// Angle in object space, degrees.
    #[default]
    ObjectAngle,
    /// Height on the object surface.
    ObjectHeight,
    /// Paraxial image height.
    ImageHeight,
}

/// One field point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Relative weight in analyses.
    #[serde(default = "unit_weight")]
    pub weight: f64,
    /// Vignetting of the upper y pupil edge.
    #[serde(default)]
    pub vuy: f64,
    /// Vignetting of the lower y pupil edge.
    #[serde(default)]
    pub vly: f64,
    /// Vignetting of the upper x pupil edge.
    #[serde(default)]
    pub vux: f64,
    /// Vignetting of the lower x pupil edge.
    #[serde(default)]
    pub vlx: f64,
    #[serde(skip)]
    aim_pt: Option<Vec2>,
}

fn unit_weight() -> f64 {
    1.0
}

impl Field {
    /// Unvignetted field at `(x, y)` with unit weight.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            weight: 1.0,
            vuy: 0.0,
            vly: 0.0,
            vux: 0.0,
            vlx: 0.0,
            aim_pt: None,
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Distance of the field point from the axis.
    pub fn radial(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Vignetting factors in `[vuy, vly, vux, vlx]` order.
    pub fn vignetting_factors(&self) -> [f64; 4] {
        [self.vuy, self.vly, self.vux, self.vlx]
    }

    /// Set vignetting factors from `[vuy, vly, vux, vlx]`.
    pub fn set_vignetting_factors(&mut self, factors: [f64; 4]) {
        [self.vuy, self.vly, self.vux, self.vlx] = factors;
    }

    /// Scale a pupil coordinate into the unvignetted part of the pupil.
    pub fn apply_vignetting(&self, pupil: Vec2) -> Vec2 {
        let x = if pupil.x < 0.0 {
            pupil.x * (1.0 - self.vlx)
        } else {
            pupil.x * (1.0 - self.vux)
        };
        let y = if pupil.y < 0.0 {
            pupil.y * (1.0 - self.vly)
        } else {
            pupil.y * (1.0 - self.vuy)
        };
        Vec2::new(x, y)
    }

    /// Cached chief-ray aim point, if computed since the last model change.
    pub fn aim_point(&self) -> Option<Vec2> {
        self.aim_pt
    }

    /// Store or clear the aim point.
    pub fn set_aim_point(&mut self, aim_pt: Option<Vec2>) {
        self.aim_pt = aim_pt;
    }
}

/// The set of field points. Never empty once deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldSpecRecord")]
pub struct FieldSpec {
    /// Interpretation of every field's coordinates.
    pub field_type: FieldType,
    fields: Vec<Field>,
}

#[derive(Deserialize)]
struct FieldSpecRecord {
    #[serde(default)]
    field_type: FieldType,
    fields: Vec<Field>,
}

impl TryFrom<FieldSpecRecord> for FieldSpec {
    type Error = SpecError;

    fn try_from(record: FieldSpecRecord) -> Result<Self> {
        if record.fields.is_empty() {
            return Err(SpecError::Empty("fields"));
        }
        Ok(Self::new(record.field_type, record.fields))
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::new(FieldType::ObjectAngle, vec![Field::new(0.0, 0.0)])
    }
}

impl FieldSpec {
    /// Field set of the given type.
    pub fn new(field_type: FieldType, fields: Vec<Field>) -> Self {
        Self { field_type, fields }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All fields.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field `index`.
    pub fn field(&self, index: usize) -> Result<&Field> {
        check_index("fields", index, self.fields.len())?;
        Ok(&self.fields[index])
    }

    /// Mutable field `index`.
    pub fn field_mut(&mut self, index: usize) -> Result<&mut Field> {
        check_index("fields", index, self.fields.len())?;
        Ok(&mut self.fields[index])
    }

    /// Append a field.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Remove field `index`. The last field cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<Field> {
        check_index("fields", index, self.fields.len())?;
        if self.fields.len() == 1 {
            return Err(SpecError::Empty("fields"));
        }
        Ok(self.fields.remove(index))
    }

    /// Largest radial field coordinate.
    pub fn max_field(&self) -> f64 {
        self.fields.iter().map(Field::radial).fold(0.0, f64::max)
    }

    /// Forget every cached aim point.
    pub fn clear_aim_points(&mut self) {
        for field in &mut self.fields {
            field.set_aim_point(None);
        }
    }

    /// Reset every field's vignetting factors to zero.
    pub fn clear_vignetting(&mut self) {
        for field in &mut self.fields {
            field.set_vignetting_factors([0.0; 4]);
        }
    }
}
