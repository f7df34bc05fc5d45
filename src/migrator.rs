use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_milk_vendors_table::Migration),
            Box::new(m20240301_000002_create_milk_procurement_table::Migration),
            Box::new(m20240301_000003_create_vendor_payments_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_milk_vendors_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_milk_vendors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MilkVendors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MilkVendors::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MilkVendors::Name).string().not_null())
                        .col(ColumnDef::new(MilkVendors::ContactName).string().null())
                        .col(ColumnDef::new(MilkVendors::Phone).string().null())
                        .col(ColumnDef::new(MilkVendors::BankAccount).string().null())
                        .col(ColumnDef::new(MilkVendors::BankIfsc).string().null())
                        .col(
                            ColumnDef::new(MilkVendors::DefaultRate)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MilkVendors::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(MilkVendors::CurrentBalance)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MilkVendors::TotalProcurement)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MilkVendors::TotalPaid)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MilkVendors::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(MilkVendors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MilkVendors::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_milk_vendors_is_active")
                        .table(MilkVendors::Table)
                        .col(MilkVendors::IsActive)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_milk_vendors_current_balance")
                        .table(MilkVendors::Table)
                        .col(MilkVendors::CurrentBalance)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MilkVendors::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum MilkVendors {
        Table,
        Id,
        Name,
        ContactName,
        Phone,
        BankAccount,
        BankIfsc,
        DefaultRate,
        IsActive,
        CurrentBalance,
        TotalProcurement,
        TotalPaid,
        Version,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000002_create_milk_procurement_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_milk_procurement_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MilkProcurement::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MilkProcurement::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MilkProcurement::VendorId).uuid().not_null())
                        .col(
                            ColumnDef::new(MilkProcurement::ProcurementDate)
                                .date()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MilkProcurement::Session).string().not_null())
                        .col(
                            ColumnDef::new(MilkProcurement::Quantity)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MilkProcurement::FatPct)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MilkProcurement::SnfPct)
                                .decimal_len(5, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MilkProcurement::RatePerLitre)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MilkProcurement::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MilkProcurement::PaymentStatus)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MilkProcurement::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MilkProcurement::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_milk_procurement_vendor_id")
                                .from(MilkProcurement::Table, MilkProcurement::VendorId)
                                .to(MilkVendors::Table, MilkVendors::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_milk_procurement_vendor_id")
                        .table(MilkProcurement::Table)
                        .col(MilkProcurement::VendorId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_milk_procurement_date")
                        .table(MilkProcurement::Table)
                        .col(MilkProcurement::ProcurementDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MilkProcurement::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum MilkProcurement {
        Table,
        Id,
        VendorId,
        ProcurementDate,
        Session,
        Quantity,
        FatPct,
        SnfPct,
        RatePerLitre,
        TotalAmount,
        PaymentStatus,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum MilkVendors {
        Table,
        Id,
    }
}

mod m20240301_000003_create_vendor_payments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_vendor_payments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(VendorPayments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VendorPayments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VendorPayments::VendorId).uuid().not_null())
                        .col(
                            ColumnDef::new(VendorPayments::PaymentDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VendorPayments::Amount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(ColumnDef::new(VendorPayments::Mode).string().not_null())
                        .col(
                            ColumnDef::new(VendorPayments::ReferenceNumber)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(VendorPayments::Notes).string().null())
                        .col(
                            ColumnDef::new(VendorPayments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vendor_payments_vendor_id")
                                .from(VendorPayments::Table, VendorPayments::VendorId)
                                .to(MilkVendors::Table, MilkVendors::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vendor_payments_vendor_id")
                        .table(VendorPayments::Table)
                        .col(VendorPayments::VendorId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vendor_payments_date")
                        .table(VendorPayments::Table)
                        .col(VendorPayments::PaymentDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VendorPayments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum VendorPayments {
        Table,
        Id,
        VendorId,
        PaymentDate,
        Amount,
        Mode,
        ReferenceNumber,
        Notes,
        CreatedAt,
    }

    #[derive(Iden)]
    enum MilkVendors {
        Table,
        Id,
    }
}
