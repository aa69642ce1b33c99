use crate::products::ProductViewModel;

/// Picks the featured deals for the storefront carousel.
///
/// Only discounted products qualify. The deepest discounts come first; ties
/// keep their catalog order. At most `limit` products are returned.
#[must_use]
pub fn select_featured_deals(products: &[ProductViewModel], limit: usize) -> Vec<ProductViewModel> {
    let mut deals: Vec<&ProductViewModel> = products.iter().filter(|p| p.has_discount()).collect();
    deals.sort_by(|a, b| b.discount.cmp(&a.discount));
    deals.into_iter().take(limit).cloned().collect()
}
