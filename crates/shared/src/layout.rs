//! Размещение объектов на плоскости пола (x, z): коррекция позиции при
//! перетаскивании и авто-раскладка сеткой.
//!
//! Высота (y) в проверке столкновений не участвует.

use serde::{Deserialize, Serialize};

use crate::{ObjectId, PlacedObject, EXEMPT_CATEGORY};

/// Допуск сравнения расстояний
const EPSILON: f64 = 1e-9;

/// Стратегия коррекции столкновений
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Один проход: позицию определяет первый найденный сосед
    #[default]
    FirstMatch,
    /// Повторять проход, пока есть пересечения (не больше `max_passes`)
    Iterative { max_passes: u32 },
}

/// Параметры коррекции столкновений
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Радиус столкновения, общий для всех объектов
    pub radius: f64,
    /// Множитель дистанции отталкивания (1.0 → ровно 2R, 1.05 → 2.1R)
    pub push_factor: f64,
    pub policy: CollisionPolicy,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            push_factor: 1.0,
            policy: CollisionPolicy::FirstMatch,
        }
    }
}

/// Недопустимые параметры раскладки
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("collision radius must be positive and finite, got {0}")]
    Radius(f64),
    #[error("push factor must be positive and finite, got {0}")]
    PushFactor(f64),
    #[error("grid spacing must be positive and finite, got {0}")]
    Spacing(f64),
    #[error("resting height must be finite, got {0}")]
    RestingHeight(f64),
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl CollisionConfig {
    /// Проверить, что радиус и множитель положительны и конечны
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !positive(self.radius) {
            return Err(LayoutError::Radius(self.radius));
        }
        if !positive(self.push_factor) {
            return Err(LayoutError::PushFactor(self.push_factor));
        }
        Ok(())
    }

    /// Минимальное расстояние между центрами
    pub fn min_distance(&self) -> f64 {
        2.0 * self.radius
    }

    fn push_distance(&self) -> f64 {
        self.min_distance() * self.push_factor
    }
}

/// Параметры авто-раскладки
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Шаг между центрами ячеек по обеим осям
    pub spacing: f64,
    /// Высота, на которую ставятся все объекты
    pub resting_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            spacing: 1.8,
            resting_height: 0.5,
        }
    }
}

impl GridLayout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !positive(self.spacing) {
            return Err(LayoutError::Spacing(self.spacing));
        }
        if !self.resting_height.is_finite() {
            return Err(LayoutError::RestingHeight(self.resting_height));
        }
        Ok(())
    }

    /// Сетка с таким шагом даёт пересечения при данном радиусе
    pub fn overlaps(&self, collision: &CollisionConfig) -> bool {
        self.spacing + EPSILON < collision.min_distance()
    }
}

fn is_finite(p: [f64; 3]) -> bool {
    p.iter().all(|v| v.is_finite())
}

fn planar_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] - b[0]).hypot(a[2] - b[2])
}

/// Скорректировать предлагаемую позицию перемещаемого объекта.
///
/// Линейный проход по всем остальным объектам. Если какой-то из них ближе
/// `2R` по (x, z), позиция выносится от его центра вдоль направления на
/// предложенную точку на дистанцию отталкивания; y сохраняется. При
/// совпадении центров сдвиг идёт по +x.
///
/// Если предложение, параметры или результат не конечны, объект остаётся
/// на текущем месте (начало координат, если его нет в списке).
pub fn resolve_position(
    moving_id: &str,
    proposed: [f64; 3],
    objects: &[PlacedObject],
    config: &CollisionConfig,
) -> [f64; 3] {
    if !is_finite(proposed) {
        tracing::warn!(moving_id, ?proposed, "rejected non-finite drag position");
        return current_position(moving_id, objects);
    }
    if let Err(e) = config.validate() {
        tracing::warn!(moving_id, "collision correction skipped: {e}");
        return current_position(moving_id, objects);
    }

    let resolved = correct(moving_id, proposed, objects, config);
    if !is_finite(resolved) {
        tracing::warn!(moving_id, ?resolved, "collision correction overflowed");
        return current_position(moving_id, objects);
    }
    resolved
}

fn current_position(moving_id: &str, objects: &[PlacedObject]) -> [f64; 3] {
    objects
        .iter()
        .find(|o| o.id == moving_id)
        .map(PlacedObject::position)
        .filter(|p| is_finite(*p))
        .unwrap_or([0.0, 0.0, 0.0])
}

fn correct(
    moving_id: &str,
    proposed: [f64; 3],
    objects: &[PlacedObject],
    config: &CollisionConfig,
) -> [f64; 3] {
    match config.policy {
        CollisionPolicy::FirstMatch => {
            push_from_first(moving_id, proposed, objects, config).unwrap_or(proposed)
        }
        CollisionPolicy::Iterative { max_passes } => {
            let mut current = proposed;
            for _ in 0..max_passes.max(1) {
                match push_from_first(moving_id, current, objects, config) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            current
        }
    }
}

fn push_from_first(
    moving_id: &str,
    proposed: [f64; 3],
    objects: &[PlacedObject],
    config: &CollisionConfig,
) -> Option<[f64; 3]> {
    let min_distance = config.min_distance();

    for other in objects {
        if other.id == moving_id {
            continue;
        }
        let anchor = other.position();
        if !is_finite(anchor) {
            continue;
        }

        let dx = proposed[0] - anchor[0];
        let dz = proposed[2] - anchor[2];
        let distance = dx.hypot(dz);
        if distance + EPSILON >= min_distance {
            continue;
        }

        let (ux, uz) = if distance > 0.0 {
            (dx / distance, dz / distance)
        } else {
            (1.0, 0.0)
        };
        let push = config.push_distance();
        let pushed = [anchor[0] + ux * push, proposed[1], anchor[2] + uz * push];
        tracing::debug!(moving_id, blocker = %other.id, ?pushed, "drag position pushed out");
        return Some(pushed);
    }

    None
}

fn is_clear(moving_id: &str, p: [f64; 3], objects: &[PlacedObject], config: &CollisionConfig) -> bool {
    let min_distance = config.min_distance();
    objects
        .iter()
        .filter(|o| o.id != moving_id && is_finite(o.position()))
        .all(|o| planar_distance(p, o.position()) + EPSILON >= min_distance)
}

/// Ближайшее к `start` место без пересечений для нового объекта.
///
/// Сначала итеративная коррекция от `start`; если она не сошлась, перебор
/// точек вдоль +x с шагом не меньше `2R`. Каждый сосед перекрывает не больше
/// двух таких точек, поэтому среди `3n + 1` точек свободная найдётся.
pub fn free_position(
    moving_id: &str,
    start: [f64; 3],
    objects: &[PlacedObject],
    config: &CollisionConfig,
) -> [f64; 3] {
    let passes = u32::try_from(objects.len()).unwrap_or(u32::MAX).saturating_add(1);
    let iterative = CollisionConfig {
        policy: CollisionPolicy::Iterative { max_passes: passes },
        ..*config
    };
    let candidate = resolve_position(moving_id, start, objects, &iterative);
    if config.validate().is_err() || is_clear(moving_id, candidate, objects, config) {
        return candidate;
    }

    let step = config.push_distance().max(config.min_distance());
    (1..=3 * objects.len() + 1)
        .map(|k| [start[0] + k as f64 * step, start[1], start[2]])
        .find(|p| is_finite(*p) && is_clear(moving_id, *p, objects, config))
        .unwrap_or(candidate)
}

/// Пары объектов, стоящих ближе `2R` (пары из двух исключённых категорий не учитываются)
pub fn collisions(objects: &[PlacedObject], config: &CollisionConfig) -> Vec<(ObjectId, ObjectId)> {
    let min_distance = config.min_distance();
    let exempt = |o: &PlacedObject| o.category.as_deref() == Some(EXEMPT_CATEGORY);

    let mut pairs = Vec::new();
    for (i, a) in objects.iter().enumerate() {
        for b in &objects[i + 1..] {
            if exempt(a) && exempt(b) {
                continue;
            }
            if planar_distance(a.position(), b.position()) + EPSILON < min_distance {
                pairs.push((a.id.clone(), b.id.clone()));
            }
        }
    }
    pairs
}

/// Размер сетки для `n` объектов: `(cols, rows)`
pub fn grid_dimensions(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    (cols, n.div_ceil(cols))
}

/// Разложить объекты сеткой, центрированной в начале координат.
///
/// Порядок построчный. Поворот и масштаб сбрасываются в исходные значения.
/// Столкновения не проверяются.
pub fn auto_layout(objects: &[PlacedObject], grid: &GridLayout) -> Vec<PlacedObject> {
    if objects.is_empty() {
        return Vec::new();
    }
    if let Err(e) = grid.validate() {
        tracing::warn!("auto layout skipped: {e}");
        return objects.to_vec();
    }

    let (cols, rows) = grid_dimensions(objects.len());
    let spacing = grid.spacing;
    let offset_x = -((cols - 1) as f64) * spacing / 2.0;
    let offset_z = -((rows - 1) as f64) * spacing / 2.0;

    let laid: Vec<PlacedObject> = objects
        .iter()
        .enumerate()
        .map(|(index, obj)| {
            let col = index % cols;
            let row = index / cols;
            let mut laid = obj.clone();
            laid.transform.position = [
                offset_x + col as f64 * spacing,
                grid.resting_height,
                offset_z + row as f64 * spacing,
            ];
            laid.transform.rotation = [0.0, 0.0, 0.0];
            laid.transform.scale = [1.0, 1.0, 1.0];
            laid
        })
        .collect();

    if laid.iter().any(|o| !is_finite(o.position())) {
        tracing::warn!(spacing, "auto layout skipped: grid does not fit in f64");
        return objects.to_vec();
    }
    laid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeometryType, Transform};

    fn obj(id: &str, x: f64, y: f64, z: f64) -> PlacedObject {
        let mut o = PlacedObject::new(id, id, GeometryType::Box.canonical());
        o.transform = Transform::at([x, y, z]);
        o
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    // --- resolve_position ---

    #[test]
    fn test_no_collision_returns_proposal() {
        let objects = vec![obj("a", 0.0, 0.0, 0.0), obj("m", 10.0, 0.0, 10.0)];
        let p = resolve_position("m", [5.0, 0.3, 0.0], &objects, &CollisionConfig::default());
        assert_eq!(p, [5.0, 0.3, 0.0]);
    }

    #[test]
    fn test_exactly_two_radii_is_not_a_collision() {
        let objects = vec![obj("a", 0.0, 0.0, 0.0)];
        let p = resolve_position("m", [2.0, 0.0, 0.0], &objects, &CollisionConfig::default());
        assert_eq!(p, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_moving_object_ignores_itself() {
        let objects = vec![obj("m", 0.0, 0.0, 0.0)];
        let p = resolve_position("m", [0.1, 0.0, 0.0], &objects, &CollisionConfig::default());
        assert_eq!(p, [0.1, 0.0, 0.0]);
    }

    #[test]
    fn test_first_match_pushes_to_two_radii() {
        let objects = vec![obj("a", 0.0, 0.0, 0.0), obj("b", 1.0, 0.0, 0.0)];
        let p = resolve_position("c", [0.5, 0.0, 0.0], &objects, &CollisionConfig::default());

        // "a" is scanned first and alone decides the correction
        assert_close(planar_distance(p, objects[0].position()), 2.0);
        assert_close(p[0], 2.0);
        assert_close(p[2], 0.0);
        assert_eq!(p[1], 0.0);
        // still overlapping "b": single pass does not cascade
        assert!(planar_distance(p, objects[1].position()) < 2.0);
    }

    #[test]
    fn test_push_preserves_height() {
        let objects = vec![obj("a", 0.0, 5.0, 0.0)];
        let p = resolve_position("m", [0.0, 0.75, 1.0], &objects, &CollisionConfig::default());
        assert_close(p[0], 0.0);
        assert_close(p[2], 2.0);
        assert_eq!(p[1], 0.75);
    }

    #[test]
    fn test_push_factor_widens_gap() {
        let config = CollisionConfig {
            push_factor: 1.05,
            ..CollisionConfig::default()
        };
        let objects = vec![obj("a", 0.0, 0.0, 0.0)];
        let p = resolve_position("m", [0.0, 0.0, -0.5], &objects, &config);
        assert_close(p[2], -2.1);
    }

    #[test]
    fn test_coincident_centres_push_along_x() {
        let objects = vec![obj("a", 3.0, 0.0, 4.0)];
        let p = resolve_position("m", [3.0, 0.5, 4.0], &objects, &CollisionConfig::default());
        assert_eq!(p, [5.0, 0.5, 4.0]);
    }

    #[test]
    fn test_iterative_resolves_cascade() {
        let config = CollisionConfig {
            policy: CollisionPolicy::Iterative { max_passes: 8 },
            ..CollisionConfig::default()
        };
        let objects = vec![obj("a", 0.0, 0.0, 0.0), obj("b", 1.0, 0.0, 0.0)];
        let p = resolve_position("c", [0.5, 0.0, 0.0], &objects, &config);
        for other in &objects {
            assert!(planar_distance(p, other.position()) + 1e-9 >= 2.0);
        }
        assert_close(p[0], 3.0);
    }

    #[test]
    fn test_non_finite_proposal_keeps_current_position() {
        let objects = vec![obj("a", 0.0, 0.0, 0.0), obj("m", 4.0, 0.5, 4.0)];
        let p = resolve_position("m", [f64::NAN, 0.0, 0.0], &objects, &CollisionConfig::default());
        assert_eq!(p, [4.0, 0.5, 4.0]);

        let p = resolve_position("ghost", [f64::INFINITY, 0.0, 0.0], &objects, &CollisionConfig::default());
        assert_eq!(p, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_finite_neighbour_is_skipped() {
        let objects = vec![obj("a", f64::NAN, 0.0, 0.0)];
        let p = resolve_position("m", [0.0, 0.0, 0.0], &objects, &CollisionConfig::default());
        assert_eq!(p, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_config_keeps_current_position() {
        let objects = vec![obj("a", 0.0, 0.0, 0.0), obj("m", 4.0, 0.5, 4.0)];
        for config in [
            CollisionConfig { radius: -1.0, ..CollisionConfig::default() },
            CollisionConfig { radius: 0.0, ..CollisionConfig::default() },
            CollisionConfig { radius: f64::NAN, ..CollisionConfig::default() },
            CollisionConfig { push_factor: -1.0, ..CollisionConfig::default() },
            CollisionConfig { push_factor: f64::INFINITY, ..CollisionConfig::default() },
        ] {
            assert!(config.validate().is_err());
            assert_eq!(resolve_position("m", [0.5, 0.0, 0.0], &objects, &config), [4.0, 0.5, 4.0]);
        }
    }

    #[test]
    fn test_overflowing_push_keeps_current_position() {
        let config = CollisionConfig { radius: 1e308, ..CollisionConfig::default() };
        assert!(config.validate().is_ok());
        let objects = vec![obj("a", 0.0, 0.0, 0.0)];
        let p = resolve_position("m", [0.5, 0.0, 0.0], &objects, &config);
        assert_eq!(p, [0.0, 0.0, 0.0]);

        let objects = vec![obj("a", 0.0, 0.0, 0.0), obj("m", 7.0, 0.5, -3.0)];
        let p = resolve_position("m", [0.5, 0.0, 0.0], &objects, &config);
        assert_eq!(p, [7.0, 0.5, -3.0]);
    }

    // --- free_position ---

    #[test]
    fn test_free_position_escapes_cascade() {
        let objects = vec![obj("a", 0.0, 0.5, 0.0), obj("b", 2.0, 0.5, 0.0)];
        let config = CollisionConfig::default();
        let p = free_position("new", [0.0, 0.5, 0.0], &objects, &config);
        assert!(is_clear("new", p, &objects, &config));
        assert_eq!(p, [4.0, 0.5, 0.0]);
    }

    #[test]
    fn test_free_position_empty_scene_is_start() {
        let p = free_position("new", [0.0, 0.5, 0.0], &[], &CollisionConfig::default());
        assert_eq!(p, [0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_free_position_dense_cluster() {
        // ring of neighbours around the origin plus a blocker on the +x axis
        let mut objects: Vec<_> = (0..8)
            .map(|i| {
                let a = i as f64 * std::f64::consts::FRAC_PI_4;
                obj(&format!("r{i}"), 1.5 * a.cos(), 0.0, 1.5 * a.sin())
            })
            .collect();
        objects.push(obj("c", 0.0, 0.0, 0.0));
        objects.push(obj("x", 3.5, 0.0, 0.0));
        let config = CollisionConfig::default();
        let p = free_position("new", [0.0, 0.0, 0.0], &objects, &config);
        assert!(is_clear("new", p, &objects, &config));
    }

    // --- collisions ---

    #[test]
    fn test_collisions_lists_close_pairs() {
        let mut ai_a = obj("x", 20.0, 0.0, 0.0);
        ai_a.category = Some(EXEMPT_CATEGORY.to_string());
        let mut ai_b = obj("y", 20.5, 0.0, 0.0);
        ai_b.category = Some(EXEMPT_CATEGORY.to_string());
        let objects = vec![
            obj("a", 0.0, 0.0, 0.0),
            obj("b", 1.0, 9.0, 0.0),
            obj("c", 10.0, 0.0, 0.0),
            ai_a,
            ai_b,
        ];
        let pairs = collisions(&objects, &CollisionConfig::default());
        assert_eq!(pairs, vec![("a".to_string(), "b".to_string())]);
    }

    // --- auto_layout ---

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_dimensions(0), (0, 0));
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (3, 2));
        assert_eq!(grid_dimensions(9), (3, 3));
        assert_eq!(grid_dimensions(10), (4, 3));
    }

    #[test]
    fn test_auto_layout_empty_is_noop() {
        assert!(auto_layout(&[], &GridLayout::default()).is_empty());
    }

    #[test]
    fn test_auto_layout_five_objects() {
        let objects: Vec<_> = (0..5).map(|i| obj(&format!("o{i}"), i as f64, 3.0, 7.0)).collect();
        let laid = auto_layout(&objects, &GridLayout::default());

        assert_eq!(laid.len(), 5);
        let p = laid[0].position();
        assert_close(p[0], -1.8);
        assert_close(p[2], -0.9);
        let p = laid[2].position();
        assert_close(p[0], 1.8);
        assert_close(p[2], -0.9);
        // 5th object: col 1, row 1
        let p = laid[4].position();
        assert_close(p[0], 0.0);
        assert_close(p[1], 0.5);
        assert_close(p[2], 0.9);
    }

    #[test]
    fn test_auto_layout_full_grid_is_centred() {
        let objects: Vec<_> = (0..9).map(|i| obj(&format!("o{i}"), 0.0, 0.0, 0.0)).collect();
        let laid = auto_layout(&objects, &GridLayout { spacing: 2.5, resting_height: 0.0 });
        let (sx, sz) = laid
            .iter()
            .fold((0.0, 0.0), |(sx, sz), o| (sx + o.position()[0], sz + o.position()[2]));
        assert_close(sx / 9.0, 0.0);
        assert_close(sz / 9.0, 0.0);
    }

    #[test]
    fn test_auto_layout_resets_pose() {
        let mut o = obj("a", 1.0, 1.0, 1.0);
        o.transform.rotation = [0.3, 1.2, -0.5];
        o.transform.scale = [2.0, 0.5, 3.0];
        let laid = auto_layout(&[o.clone(), o], &GridLayout::default());
        for l in &laid {
            assert_eq!(l.transform.rotation, [0.0, 0.0, 0.0]);
            assert_eq!(l.transform.scale, [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn test_auto_layout_keeps_other_fields() {
        let mut o = obj("a", 1.0, 1.0, 1.0);
        o.category = Some("Tools".to_string());
        o.visible = false;
        let laid = auto_layout(&[o.clone()], &GridLayout::default());
        assert_eq!(laid[0].id, o.id);
        assert_eq!(laid[0].category, o.category);
        assert!(!laid[0].visible);
        assert_eq!(laid[0].position(), [0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_auto_layout_rejects_bad_grid() {
        let objects: Vec<_> = (0..5).map(|i| obj(&format!("o{i}"), i as f64, 0.0, 0.0)).collect();
        for grid in [
            GridLayout { spacing: 0.0, resting_height: 0.5 },
            GridLayout { spacing: -1.8, resting_height: 0.5 },
            GridLayout { spacing: 1.8, resting_height: f64::NAN },
        ] {
            assert!(grid.validate().is_err());
            assert_eq!(auto_layout(&objects, &grid), objects);
        }
    }

    #[test]
    fn test_auto_layout_overflow_keeps_positions() {
        let objects: Vec<_> = (0..5).map(|i| obj(&format!("o{i}"), i as f64, 0.0, 0.0)).collect();
        let grid = GridLayout { spacing: 1e308, resting_height: 0.5 };
        assert!(grid.validate().is_ok());
        let laid = auto_layout(&objects, &grid);
        assert_eq!(laid, objects);
        assert!(laid.iter().all(|o| o.position().iter().all(|v| v.is_finite())));
    }

    #[test]
    fn test_grid_overlap_detection() {
        let collision = CollisionConfig::default();
        assert!(GridLayout::default().overlaps(&collision));
        assert!(!GridLayout { spacing: 2.0, resting_height: 0.5 }.overlaps(&collision));
    }
}
