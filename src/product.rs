/// Placeholder stored for any attribute that could not be scraped.
pub const NOT_AVAILABLE: &str = "N/A";

/// Attribute columns written for every row, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Classification,
    Name,
    ImageUrl,
    Finish,
    Categories,
    ManufacturerResources,
    DimensionsMeasurements,
    IncludedComponents,
    CharacteristicsFeatures,
    WarrantyProductInformation,
    Features,
    ElectricalOperationalInformation,
    Specifications,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Classification,
        Field::Name,
        Field::ImageUrl,
        Field::Finish,
        Field::Categories,
        Field::ManufacturerResources,
        Field::DimensionsMeasurements,
        Field::IncludedComponents,
        Field::CharacteristicsFeatures,
        Field::WarrantyProductInformation,
        Field::Features,
        Field::ElectricalOperationalInformation,
        Field::Specifications,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Field::Classification => "Classification",
            Field::Name => "Name",
            Field::ImageUrl => "Image_URL",
            Field::Finish => "Finish",
            Field::Categories => "Categories",
            Field::ManufacturerResources => "Manufacturer_Resources",
            Field::DimensionsMeasurements => "Dimensions&Measurements",
            Field::IncludedComponents => "Included_components",
            Field::CharacteristicsFeatures => "Characteristics&Features",
            Field::WarrantyProductInformation => "Warranty&Product_Information",
            Field::Features => "Features",
            Field::ElectricalOperationalInformation => "Electrical&Operational_Information",
            Field::Specifications => "Specifications",
        }
    }

    /// Separator used when a list value is flattened into a single cell.
    /// Classification is a breadcrumb, so it keeps a hierarchical separator.
    pub fn separator(self) -> &'static str {
        match self {
            Field::Classification => ">>>",
            _ => "; ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn flatten(&self, separator: &str) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(separator),
        }
    }
}

/// Everything scraped from one detail page. `None` means the field was not
/// found at all, as opposed to a section that exists but is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetail {
    pub classification: Option<FieldValue>,
    pub name: Option<FieldValue>,
    pub image_url: Option<FieldValue>,
    pub finish: Option<FieldValue>,
    pub categories: Option<FieldValue>,
    pub manufacturer_resources: Option<FieldValue>,
    pub dimensions_measurements: Option<FieldValue>,
    pub included_components: Option<FieldValue>,
    pub characteristics_features: Option<FieldValue>,
    pub warranty_product_information: Option<FieldValue>,
    pub features: Option<FieldValue>,
    pub electrical_operational_information: Option<FieldValue>,
    pub specifications: Option<FieldValue>,
}

impl ProductDetail {
    fn slot(&mut self, field: Field) -> &mut Option<FieldValue> {
        match field {
            Field::Classification => &mut self.classification,
            Field::Name => &mut self.name,
            Field::ImageUrl => &mut self.image_url,
            Field::Finish => &mut self.finish,
            Field::Categories => &mut self.categories,
            Field::ManufacturerResources => &mut self.manufacturer_resources,
            Field::DimensionsMeasurements => &mut self.dimensions_measurements,
            Field::IncludedComponents => &mut self.included_components,
            Field::CharacteristicsFeatures => &mut self.characteristics_features,
            Field::WarrantyProductInformation => &mut self.warranty_product_information,
            Field::Features => &mut self.features,
            Field::ElectricalOperationalInformation => &mut self.electrical_operational_information,
            Field::Specifications => &mut self.specifications,
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        match field {
            Field::Classification => self.classification.as_ref(),
            Field::Name => self.name.as_ref(),
            Field::ImageUrl => self.image_url.as_ref(),
            Field::Finish => self.finish.as_ref(),
            Field::Categories => self.categories.as_ref(),
            Field::ManufacturerResources => self.manufacturer_resources.as_ref(),
            Field::DimensionsMeasurements => self.dimensions_measurements.as_ref(),
            Field::IncludedComponents => self.included_components.as_ref(),
            Field::CharacteristicsFeatures => self.characteristics_features.as_ref(),
            Field::WarrantyProductInformation => self.warranty_product_information.as_ref(),
            Field::Features => self.features.as_ref(),
            Field::ElectricalOperationalInformation => self.electrical_operational_information.as_ref(),
            Field::Specifications => self.specifications.as_ref(),
        }
    }

    pub fn set(&mut self, field: Field, value: FieldValue) {
        *self.slot(field) = Some(value);
    }

    /// Number of fields that were actually scraped.
    pub fn populated(&self) -> usize {
        Field::ALL.iter().filter(|f| self.get(**f).is_some()).count()
    }

    /// Cell text for `field`: the flattened value, or the sentinel when missing.
    pub fn cell(&self, field: Field) -> String {
        match self.get(field) {
            Some(value) => value.flatten(field.separator()),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}
