use crate::arena::Index;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn flip(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// A struct representing an internal node of a red black tree.
///
/// Links are arena indices. `None` stands in for the black NIL leaf, and for the parent of the
/// root. The parent link is only used to walk back up the tree.
pub struct Node<T> {
    pub elem: T,
    pub color: Color,
    pub parent: Option<Index>,
    pub left: Option<Index>,
    pub right: Option<Index>,
}

impl<T> Node<T> {
    pub fn new(elem: T, color: Color, parent: Option<Index>) -> Self {
        Node {
            elem,
            color,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}
