//! Weapon selection menu

use super::weapon::Weapon;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    #[error("weapon menu requires at least one weapon")]
    Empty,
}

#[derive(Debug, Clone)]
pub struct WeaponMenu {
    weapons: Vec<Weapon>,
    selected: usize,
}

impl WeaponMenu {
    pub fn new(weapons: &[Weapon]) -> Result<Self, MenuError> {
        if weapons.is_empty() {
            return Err(MenuError::Empty);
        }
        Ok(Self {
            weapons: weapons.to_vec(),
            selected: 0,
        })
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn selected(&self) -> &Weapon {
        &self.weapons[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Moves the highlight by `delta`, wrapping at both ends
    pub fn move_selection(&mut self, delta: i32) {
        let len = self.weapons.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
    }

    /// Sets the highlight, clamped to the last entry
    pub fn set_selected_index(&mut self, index: usize) {
        self.selected = index.min(self.weapons.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapon::{AEGIS_LANCE, PULSE_PISTOL, catalog};

    #[test]
    fn test_empty_menu_rejected() {
        assert_eq!(WeaponMenu::new(&[]).unwrap_err(), MenuError::Empty);
    }

    #[test]
    fn test_selection_wraps() {
        let mut menu = WeaponMenu::new(catalog()).unwrap();
        assert_eq!(menu.selected(), &AEGIS_LANCE);
        menu.move_selection(-1);
        assert_eq!(menu.selected(), &PULSE_PISTOL);
        menu.move_selection(1);
        assert_eq!(menu.selected_index(), 0);
        menu.move_selection(5);
        assert_eq!(menu.selected_index(), 1);
    }

    #[test]
    fn test_set_selected_clamps() {
        let mut menu = WeaponMenu::new(catalog()).unwrap();
        menu.set_selected_index(10);
        assert_eq!(menu.selected_index(), 1);
        menu.set_selected_index(0);
        assert_eq!(menu.selected(), &AEGIS_LANCE);
    }
}
