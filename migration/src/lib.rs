pub use sea_orm_migration::prelude::*;

mod m20240301_120000_create_schema;
mod m20240301_120500_create_nodes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_120000_create_schema::Migration),
            Box::new(m20240301_120500_create_nodes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_registered_in_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|migration| migration.name().to_string())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();

        assert_eq!(names.len(), 2);
        assert_eq!(names, sorted);
    }
}
