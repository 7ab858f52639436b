use crate::commands::Out;
use crate::model::Category;

/// Lists the categories an expense can have.
pub fn categories() -> Out<Vec<Category>> {
    let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    Out::new(
        format!("Categories: {}", labels.join(", ")),
        Category::ALL.to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let out = categories();
        assert_eq!(
            out.message(),
            "Categories: Food, Travel, Bills, Shopping, Health, Other"
        );
        assert_eq!(out.structure().unwrap().len(), 6);
    }
}
