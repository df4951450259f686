//! URL slug generation for products.

use std::collections::HashSet;

/// Turn a product name into a URL slug: ASCII-lowercased, alphanumeric runs
/// joined by single hyphens, nothing leading or trailing. Characters outside
/// ASCII alphanumerics act as separators and are dropped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Derive the slug to assign to one product. Names made of symbols slugify
/// to nothing; those fall back to `product-{id}`. Batch callers record the
/// result in `taken` before moving to the next product.
pub fn slug_for_product(name: &str, product_id: &str, taken: &HashSet<String>) -> String {
    let base = slugify(name);
    let base = if base.is_empty() {
        format!("product-{}", product_id)
    } else {
        base
    };
    unique_slug(&base, taken)
}

/// Pick a slug based on `base` that does not collide with `taken`. The base
/// itself wins when free; otherwise `-2`, `-3`, … are appended until an
/// unused candidate appears. The caller records the choice in `taken` when
/// assigning slugs in a batch.
pub fn unique_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut n = 2u32;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
