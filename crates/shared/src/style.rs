//! Применение стилевых пресетов: категория → канонический примитив.

use crate::{Asset, PlacedObject, Primitive, StylePreset, EXEMPT_CATEGORY};

/// Запись, у которой стиль может заменить примитив
pub trait Styleable {
    fn style_category(&self) -> Option<&str>;
    fn primitive_mut(&mut self) -> &mut Primitive;
}

impl Styleable for PlacedObject {
    fn style_category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn primitive_mut(&mut self) -> &mut Primitive {
        &mut self.primitive
    }
}

impl Styleable for Asset {
    fn style_category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn primitive_mut(&mut self) -> &mut Primitive {
        &mut self.primitive
    }
}

/// Переписать примитив одной записи. Возвращает true, если запись изменилась
pub fn restyle<T: Styleable>(preset: &StylePreset, item: &mut T) -> bool {
    let geometry = match item.style_category() {
        Some(EXEMPT_CATEGORY) | None => return false,
        Some(category) => match preset.geometry_for(category) {
            Some(geometry) => geometry,
            None => return false,
        },
    };

    let primitive = geometry.canonical();
    let slot = item.primitive_mut();
    if *slot == primitive {
        return false;
    }
    *slot = primitive;
    true
}

/// Применить пресет к коллекции; исходная коллекция не меняется.
///
/// Параметры заменяются целиком из канонической таблицы, поэтому
/// повторное применение того же пресета ничего не меняет.
pub fn apply_style<T: Styleable + Clone>(preset: &StylePreset, items: &[T]) -> Vec<T> {
    items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            restyle(preset, &mut item);
            item
        })
        .collect()
}
