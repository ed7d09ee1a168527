use std::fmt::Display;

use bumpalo::{collections::Vec as BumpVec, Bump};

use crate::diagnostics::field_coordinate;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PathSegment<'a> {
    // Link to the previous hop, none for the root field
    prev: Option<&'a PathSegment<'a>>,
    pub schema: &'a str,
    pub type_name: &'a str,
    pub field_name: &'a str,
    pub output_type: &'a str,
}

impl Display for PathSegment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            field_coordinate(self.schema, self.type_name, self.field_name, self.output_type)
        )
    }
}

/// The hops that led the walker to the current type, kept only for diagnostics.
/// Segments are shared between paths, so advancing never changes the path it started from.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TransitionPath<'a> {
    last_segment: Option<&'a PathSegment<'a>>,
    len: usize,
}

impl<'a> TransitionPath<'a> {
    pub fn advance(
        &self,
        arena: &'a Bump,
        schema: &'a str,
        type_name: &'a str,
        field_name: &'a str,
        output_type: &'a str,
    ) -> TransitionPath<'a> {
        let segment = arena.alloc(PathSegment {
            prev: self.last_segment,
            schema,
            type_name,
            field_name,
            output_type,
        });

        TransitionPath {
            last_segment: Some(segment),
            len: self.len + 1,
        }
    }

    pub fn segments(&self, arena: &'a Bump) -> BumpVec<'a, &'a PathSegment<'a>> {
        let mut segments = BumpVec::with_capacity_in(self.len, arena);
        let mut current = self.last_segment;

        while let Some(segment) = current {
            segments.push(segment);
            current = segment.prev;
        }
        segments.reverse();
        segments
    }
}

impl Display for TransitionPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut segments = Vec::with_capacity(self.len);
        let mut current = self.last_segment;

        while let Some(segment) = current {
            segments.push(segment);
            current = segment.prev;
        }

        for (i, segment) in segments.iter().rev().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", segment)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;

    use super::TransitionPath;

    #[test]
    fn renders_segments_in_order() {
        let arena = Bump::new();
        let root = TransitionPath::default();
        assert_eq!(root.to_string(), "");
        assert!(root.segments(&arena).is_empty());

        let product = root.advance(&arena, "A", "Query", "productById", "Product");
        let user = product.advance(&arena, "A", "Product", "user", "User");

        assert_eq!(
            user.to_string(),
            "A:Query.productById<Product> -> A:Product.user<User>"
        );
        let segments = user.segments(&arena);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].field_name, "user");
    }

    #[test]
    fn diverging_branches_do_not_share_tails() {
        let arena = Bump::new();
        let product = TransitionPath::default().advance(&arena, "A", "Query", "product", "Product");

        let left = product.advance(&arena, "A", "Product", "category", "Category");
        let right = product.advance(&arena, "B", "Product", "reviews", "Review");

        assert_eq!(
            left.to_string(),
            "A:Query.product<Product> -> A:Product.category<Category>"
        );
        assert_eq!(
            right.to_string(),
            "A:Query.product<Product> -> B:Product.reviews<Review>"
        );
        assert_eq!(product.to_string(), "A:Query.product<Product>");
    }
}
