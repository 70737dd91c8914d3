/// How samples outside the image are resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum BorderMode<T> {
    Clamp,
    Constant(T),
}

pub fn map_index<T>(i: isize, len: usize, mode: &BorderMode<T>) -> Option<usize> {
    match mode {
        BorderMode::Constant(_) => {
            if i < 0 || i as usize >= len {
                None
            } else {
                Some(i as usize)
            }
        }
        BorderMode::Clamp => {
            if len == 0 {
                return None;
            }
            Some(i.clamp(0, len as isize - 1) as usize)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BorderMode, map_index};

    #[test]
    fn clamp_pins_to_edges() {
        let mode = BorderMode::<f32>::Clamp;

        assert_eq!(map_index(-3, 5, &mode), Some(0));
        assert_eq!(map_index(2, 5, &mode), Some(2));
        assert_eq!(map_index(5, 5, &mode), Some(4));
        assert_eq!(map_index(0, 0, &mode), None);
    }

    #[test]
    fn constant_rejects_outside_indices() {
        let mode = BorderMode::Constant(0.0f32);

        assert_eq!(map_index(-1, 5, &mode), None);
        assert_eq!(map_index(0, 5, &mode), Some(0));
        assert_eq!(map_index(4, 5, &mode), Some(4));
        assert_eq!(map_index(5, 5, &mode), None);
    }
}
